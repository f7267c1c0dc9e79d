use anyhow::anyhow;
use axum::serve;
use futures::TryFutureExt;
use log::{error, info};
use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
    sync::Arc,
};
use tokio::{net::TcpListener, signal};
use weather_api::{
    app, build_app_state, get_config_info, get_log_level, setup_logger, MySqlWarehouse,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (cli, config_source) = get_config_info();
    let log_level = get_log_level(&cli);

    setup_logger()
        .level(log_level)
        .level_for("sqlx", log_level)
        .level_for("weather_api", log_level)
        .level_for("http_response", log_level)
        .level_for("http_request", log_level)
        .apply()?;

    let host = cli.host();
    let port = cli.port();
    let static_dir = cli.static_dir();
    let database = cli.database_settings();
    let series_options = cli.series_options();
    let csv_offset = cli.csv_offset()?;

    let ip = IpAddr::from_str(&host).map_err(|e| anyhow!("invalid host '{}': {}", host, e))?;
    let socket_addr = SocketAddr::new(ip, port);

    let listener = TcpListener::bind(socket_addr)
        .map_err(|e| anyhow!("error binding to socket: {}", e))
        .await?;

    info!("Weather API starting...");
    info!("  Config:    {}", config_source);
    info!("  Listen:    http://{}", socket_addr);
    info!("  Docs:      http://{}/docs", socket_addr);
    info!("  Warehouse: {}", database);
    info!("  Static:    {}", static_dir);
    if let Some(limit) = series_options.limit {
        info!("  Series limit: {} row(s)", limit);
    }

    // Connections are opened on first use, demo routes work without a warehouse.
    let warehouse = Arc::new(MySqlWarehouse::connect_lazy(&database));
    let app_state = build_app_state(warehouse.clone(), series_options, csv_offset, static_dir);
    let app = app(app_state);

    let served = serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await;

    info!("shutting down, closing warehouse connections");
    warehouse.close().await;

    served.map_err(|e| {
        error!("server error: {}", e);
        e.into()
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
