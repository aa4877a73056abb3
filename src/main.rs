use crate::config::Config;
use crate::responses::{apply_cors, error_to_response};
use crate::router::{handle, AppContext};
use astra::Server;
use log::{error, info, warn};
use std::net::SocketAddr;

mod chat;
mod config;
mod domain;
mod errors;
mod relay;
mod responses;
mod router;
mod store;
mod sync;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    env_logger::init();

    // 1️⃣ Read configuration from the environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration failed: {e}");
            std::process::exit(1);
        }
    };

    if config.store.is_none() {
        warn!("Astra DB not configured; data routes will answer 400");
    }
    if config.relay.is_none() {
        warn!("LangFlow relay not configured; push and chat routes will answer 400");
    }
    if config.ticketing.is_none() {
        warn!("ServiceNow source not configured; sync route will answer 400");
    }

    // 2️⃣ Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting server at http://{addr}");

    let ctx = AppContext { config };

    let server = Server::bind(addr).max_workers(8);

    // 3️⃣ Serve requests; errors become the JSON error envelope
    let result = server.serve(move |req, _info| match handle(req, &ctx) {
        Ok(resp) => resp,
        Err(err) => apply_cors(
            error_to_response(err),
            ctx.config.allowed_origin.as_deref(),
        ),
    });

    if let Err(e) = result {
        error!("Server ended with error: {e}");
    }

    info!("Server shut down cleanly.");
}
