use axum::{Router, routing::post};

use crate::AppState;

mod login;
mod openid;
mod wechat;

pub use openid::OpenId;
pub use wechat::{CodeExchange, WeChatClient, WeChatError};

pub fn router() -> Router<AppState> {
    Router::new().route("/login", post(login::login))
}

/// Name given to a user on first login: "用户" plus the first six characters of the openid.
pub fn default_nickname(open_id: &str) -> String {
    let prefix: String = open_id.chars().take(6).collect();
    format!("用户{prefix}")
}
