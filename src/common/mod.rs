pub mod article;
pub mod comment;
pub mod newtypes;
pub mod notifications;
pub mod user;

use serde::{Deserialize, Serialize};

/// Header and cookie name carrying the login token.
pub static AUTH_COOKIE: &str = "auth";

#[derive(Deserialize, Serialize, Debug)]
pub struct SuccessResponse {
    success: bool,
}

impl Default for SuccessResponse {
    fn default() -> Self {
        Self { success: true }
    }
}
