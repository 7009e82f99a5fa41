use crate::backend::utils::error::BackendResult;
use config::Config;
use doku::Document;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::net::SocketAddr;

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Document, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct MagpieConfig {
    /// Address where magpie listens for requests
    #[default(SocketAddr::from(([127, 0, 0, 1], 8131)))]
    #[doku(as = "String", example = "127.0.0.1:8131")]
    pub bind: SocketAddr,
    pub auth: MagpieConfigAuth,
    pub comments: MagpieConfigComments,
}

impl MagpieConfig {
    pub fn read() -> BackendResult<Self> {
        let config = Config::builder()
            .add_source(config::File::with_name("config.toml").required(false))
            // Cant use _ as separator due to https://github.com/mehcode/config-rs/issues/391
            .add_source(config::Environment::with_prefix("MAGPIE").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Document, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct MagpieConfigAuth {
    /// Secret used to sign login tokens
    #[default("changeme")]
    #[doku(example = "changeme")]
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq, Clone, Document, SmartDefault)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct MagpieConfigComments {
    /// Comments returned per page when the client passes no limit
    #[default(5)]
    #[doku(example = "5")]
    pub page_size: usize,
}
