use local_tokens::config::ServeSettings;
use local_tokens::{LocalTokenConfig, LocalTokenServer};
use log::{error, info};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Load configuration
    let settings = match ServeSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let config = LocalTokenConfig::new(settings.audience.clone(), settings.secret.clone());
    let mut server = LocalTokenServer::new(config);

    let live = match server.start(settings.port, &settings.host).await {
        Ok(live) => live,
        Err(e) => {
            error!("Failed to start token server: {}", e);
            std::process::exit(1);
        }
    };

    info!("Issuer URL: {}", live.issuer_uri);
    info!("JWKS URL: {}", live.jwks_uri);
    info!("OpenID configuration: {}", live.openid_uri);
    info!("Audience + client_id: {}", live.audience);

    shutdown_signal().await;
    if let Err(e) = server.stop().await {
        error!("Shutdown error: {}", e);
        std::process::exit(1);
    }
    info!("Server shutdown complete");
}

// Simple signal handler that works on all platforms
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
