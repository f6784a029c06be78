// This is imported by different tests that use different functions.
#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{Body, to_bytes};
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, request};
use axum::response::Response;
use axum::Router;
use sqlx::SqlitePool;

use scoreroom::auth::{CodeExchange, WeChatError};
use scoreroom::store::Store;
use scoreroom::AppState;

/// Maps code `c` to openid `openid-c`; `rejected` and `offline` fail the two ways WeChat can.
pub struct StubWeChat;

#[async_trait]
impl CodeExchange for StubWeChat {
    async fn code_to_session(&self, code: &str) -> Result<String, WeChatError> {
        match code {
            "rejected" => Err(WeChatError::Rejected {
                code: 40029,
                message: "invalid code".to_owned(),
            }),
            "offline" => Err(WeChatError::Malformed("connection reset".to_owned())),
            code => Ok(format!("openid-{code}")),
        }
    }
}

pub fn app(db: SqlitePool) -> Router {
    scoreroom::app(AppState {
        store: Store::new(db),
        wechat: Arc::new(StubWeChat),
    })
}

pub trait RequestBuilderExt {
    fn open_id(self, open_id: &str) -> Self;

    fn json(self, json: serde_json::Value) -> Request<Body>;

    fn empty_body(self) -> Request<Body>;
}

impl RequestBuilderExt for request::Builder {
    fn open_id(self, open_id: &str) -> Self {
        self.header("openId", open_id)
    }

    fn json(self, json: serde_json::Value) -> Request<Body> {
        self.header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("failed to build request")
    }

    fn empty_body(self) -> Request<Body> {
        self.body(Body::empty()).expect("failed to build request")
    }
}

pub async fn response_json(resp: Response) -> serde_json::Value {
    assert_eq!(
        resp.headers()
            .get(CONTENT_TYPE)
            .expect("expected Content-Type"),
        "application/json"
    );

    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("error reading response body");

    serde_json::from_slice(&bytes).expect("failed to read response body as json")
}

pub async fn response_text(resp: Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("error reading response body");

    String::from_utf8(bytes.to_vec()).expect("response body is not utf-8")
}

/// Registers `openid` with the given nickname.
pub async fn user(store: &Store, openid: &str, nickname: &str) {
    store
        .ensure_user(openid, nickname)
        .await
        .expect("failed to register user");
}
