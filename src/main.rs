use log::LevelFilter;
use magpie::backend::{config::MagpieConfig, start, utils::error::BackendResult};

#[tokio::main]
async fn main() -> BackendResult<()> {
    if std::env::args().nth(1).as_deref() == Some("--print-config") {
        println!("{}", doku::to_toml::<MagpieConfig>());
        return Ok(());
    }

    env_logger::builder()
        .filter_level(LevelFilter::Warn)
        .filter_module("magpie", LevelFilter::Info)
        .init();

    let config = MagpieConfig::read()?;
    start(config).await
}
