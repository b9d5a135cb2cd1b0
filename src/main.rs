use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use cuentas::{
    AppState, build_router, graceful_shutdown,
    store::{SqliteRecordStore, initialize},
};

/// The HTTP server for the cuentas finance tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let conn = Connection::open(&args.db_path).expect("Could not open the database file.");
    initialize(&conn).expect("Could not create the database tables.");

    let state = AppState::new(SqliteRecordStore::new(Arc::new(Mutex::new(conn))));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(build_router(state).into_make_service())
        .await
        .expect("The server stopped unexpectedly.");
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty().with_filter(filter))
        .init();
}
