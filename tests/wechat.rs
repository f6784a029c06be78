use std::collections::HashMap;

use axum::{Router, extract::Query, http::StatusCode, response::IntoResponse, routing::get};
use tokio::net::TcpListener;

use scoreroom::auth::{CodeExchange, WeChatClient, WeChatError};

// Answers like jscode2session does, including the text/plain content type.
async fn jscode2session(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("appid").map(String::as_str) != Some("wx-app")
        || params.get("secret").map(String::as_str) != Some("wx-secret")
        || params.get("grant_type").map(String::as_str) != Some("authorization_code")
    {
        return (StatusCode::OK, r#"{"errcode":40125,"errmsg":"invalid appsecret"}"#.to_owned());
    }

    let body = match params.get("js_code").map(String::as_str) {
        Some("good") => r#"{"openid":"oWx123","session_key":"c2Vzc2lvbg=="}"#.to_owned(),
        Some("used") => r#"{"errcode":40163,"errmsg":"code been used"}"#.to_owned(),
        Some("garbage") => "<html>oops</html>".to_owned(),
        Some("empty") => "{}".to_owned(),
        Some("boom") => return (StatusCode::INTERNAL_SERVER_ERROR, String::new()),
        _ => r#"{"errcode":40029,"errmsg":"invalid code"}"#.to_owned(),
    };
    (StatusCode::OK, body)
}

async fn fake_wechat() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().route("/sns/jscode2session", get(jscode2session));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

#[tokio::test]
async fn test_code_to_session() {
    let base = fake_wechat().await;
    let client = WeChatClient::new(base, "wx-app", "wx-secret").unwrap();

    assert_eq!(client.code_to_session("good").await.unwrap(), "oWx123");

    match client.code_to_session("used").await {
        Err(WeChatError::Rejected { code, message }) => {
            assert_eq!(code, 40163);
            assert_eq!(message, "code been used");
        }
        other => panic!("expected rejection, got {other:?}"),
    }

    assert!(matches!(
        client.code_to_session("garbage").await,
        Err(WeChatError::Malformed(_))
    ));
    assert!(matches!(
        client.code_to_session("empty").await,
        Err(WeChatError::Malformed(_))
    ));
    assert!(matches!(
        client.code_to_session("boom").await,
        Err(WeChatError::Transport(_))
    ));
}

#[tokio::test]
async fn test_wrong_credentials_rejected() {
    let base = fake_wechat().await;
    let client = WeChatClient::new(base, "wx-app", "not-the-secret").unwrap();

    assert!(matches!(
        client.code_to_session("good").await,
        Err(WeChatError::Rejected { code: 40125, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_provider() {
    // bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = WeChatClient::new(format!("http://{addr}"), "wx-app", "wx-secret").unwrap();
    assert!(matches!(
        client.code_to_session("good").await,
        Err(WeChatError::Transport(_))
    ));
}
