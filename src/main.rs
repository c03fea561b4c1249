// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Relay Service
//!
//! Receives the portfolio site's contact form and relays it to EmailJS:
//!
//! - `POST /contact`: validate, gate and send a submission
//! - `POST /contact/validate`: validation only
//! - `GET /health`: liveness
//!
//! ## Configuration
//!
//! Configuration is read from the environment, after loading an optional
//! `.env` file:
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `EMAILJS_SERVICE_ID`, `EMAILJS_TEMPLATE_ID`, `EMAILJS_PUBLIC_KEY`: provider identity
//! - `EMAILJS_ACCESS_TOKEN`: optional private key
//! - `CONTACT_RECIPIENT_EMAIL`, `CONTACT_RECIPIENT_NAME`: message recipient
//! - `RATE_LIMIT_MAX_SUBMISSIONS`: submissions per window (default: 3)
//! - `RATE_LIMIT_WINDOW_SECS`: window length (default: 3600)
//! - `RATE_LIMIT_STATE_DIR`: where the gate state is kept (default: ./state)
//! - `CORS_ALLOWED_ORIGIN`: site origin allowed to post the form

use anyhow::{bail, Context};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_relay::{
    clock::SystemClock,
    config::Config,
    dispatcher::{setup_instructions, EmailDispatcher, EmailJsProvider},
    handlers::{cors_layer, router, AppState},
    limiter::SubmissionGate,
    storage::FileStore,
    validator::ContactValidator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let config = Config::from_env().context("invalid configuration")?;

    let missing = config.email.missing();
    if !missing.is_empty() {
        warn!(?missing, "Email provider is not configured");
        info!("{}", setup_instructions());
        bail!("missing email provider settings: {}", missing.join(", "));
    }
    if config.recipient.email.trim().is_empty() {
        bail!("missing CONTACT_RECIPIENT_EMAIL");
    }

    info!(
        bind_addr = %config.bind_addr,
        max_submissions = config.rate_limit.max_submissions,
        window_secs = config.rate_limit.window_secs,
        state_dir = %config.rate_limit.state_dir.display(),
        "Starting contact relay"
    );

    // Create application state
    let store = FileStore::open(&config.rate_limit.state_dir)
        .context("failed to open rate limit state directory")?;
    let gate = SubmissionGate::new(
        config.rate_limit.clone(),
        Arc::new(store),
        Arc::new(SystemClock),
    );
    let provider = EmailJsProvider::init(config.email.clone())?;
    let dispatcher = EmailDispatcher::new(
        Arc::new(provider),
        Arc::new(gate),
        config.recipient.clone(),
    );

    let state = Arc::new(AppState {
        validator: ContactValidator::new(config.validation.clone()),
        dispatcher,
    });

    // Build router
    let app = router(state)
        .layer(cors_layer(config.cors_allowed_origin.as_deref()))
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
