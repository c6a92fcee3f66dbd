// SPDX-License-Identifier: Apache-2.0
use actix_web::{web, App, HttpServer};
use lettre::{AsyncSmtpTransport, Tokio1Executor};
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;

use geoform_relay::config::AppConfig;
use geoform_relay::logging::init_from_env;
use geoform_relay::relay::{configure, cors, RelayState};

type SmtpTransport = AsyncSmtpTransport<Tokio1Executor>;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();
    init_from_env("geoform_relay");

    info!("Starting form relay...");
    let config = AppConfig::from_env();
    let port = config.port;

    let state = web::Data::new(RelayState::from_config(&config));
    if !state.is_configured() {
        warn!("Serving without email delivery; set SMTP_HOST, SMTP_PORT, SMTP_USER, SMTP_PASS and TO_EMAIL");
    }

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(TracingLogger::default())
            .app_data(state.clone())
            .configure(configure::<SmtpTransport>)
    })
    .bind(("0.0.0.0", port))?;

    info!("Form server listening on http://localhost:{}", port);
    server.run().await
}
