use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum WeChatError {
    #[error("wechat request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed wechat response: {0}")]
    Malformed(String),

    /// WeChat answered, but refused the code.
    #[error("wechat rejected login code ({code}): {message}")]
    Rejected { code: i64, message: String },
}

/// Turns a one-time login code into the user's stable openid.
#[async_trait]
pub trait CodeExchange: Send + Sync {
    async fn code_to_session(&self, code: &str) -> Result<String, WeChatError>;
}

// session_key is never read.
#[derive(Deserialize)]
struct SessionResponse {
    openid: Option<String>,
    #[serde(default)]
    errcode: i64,
    #[serde(default)]
    errmsg: String,
}

#[derive(Clone)]
pub struct WeChatClient {
    http_client: reqwest::Client,
    api_base: String,
    app_id: String,
    app_secret: String,
}

impl WeChatClient {
    pub fn new(
        api_base: impl Into<String>,
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
    ) -> Result<WeChatClient, WeChatError> {
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(WeChatClient {
            http_client,
            api_base: api_base.into().trim_end_matches('/').to_owned(),
            app_id: app_id.into(),
            app_secret: app_secret.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<WeChatClient, WeChatError> {
        WeChatClient::new(&config.wechat_api_base, &config.app_id, &config.app_secret)
    }
}

#[async_trait]
impl CodeExchange for WeChatClient {
    async fn code_to_session(&self, code: &str) -> Result<String, WeChatError> {
        // WeChat labels this body text/plain, so it is parsed by hand
        let body = self
            .http_client
            .get(format!("{}/sns/jscode2session", self.api_base))
            .query(&[
                ("appid", self.app_id.as_str()),
                ("secret", self.app_secret.as_str()),
                ("js_code", code),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let session: SessionResponse =
            serde_json::from_str(&body).map_err(|e| WeChatError::Malformed(e.to_string()))?;

        if session.errcode != 0 {
            return Err(WeChatError::Rejected {
                code: session.errcode,
                message: session.errmsg,
            });
        }

        match session.openid {
            Some(openid) if !openid.is_empty() => Ok(openid),
            _ => Err(WeChatError::Malformed("no openid in response".to_owned())),
        }
    }
}
