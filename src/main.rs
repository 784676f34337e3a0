use log::{error, info};
use service::{config::Config, logging::Logger};

#[tokio::main]
async fn main() {
    let config = Config::new();
    Logger::init_logger(&config as &Config);

    info!("Starting Seznam login host [{}]...", config.root_url());

    let app_state = match service::init_login(&config) {
        Ok(app_state) => app_state,
        Err(e) => {
            error!("Failed to initialize login providers: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = web::init_server(app_state).await {
        error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
