use docscan_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router) = docscan_api::setup::initialize_app(config.clone()).await?;

    docscan_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
