use klypp_server::api::app_router;
use klypp_server::config::Config;
use klypp_server::main_lib::{build_state, init_tracing};
use klypp_server::scheduler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config).await?;

    if config.renewal_rollover_enabled {
        scheduler::start_renewal_rollover(state.clone());
    }

    let router = app_router(state, &config);
    tracing::info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
