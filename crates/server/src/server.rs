use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{clubs, coaches, players};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Build the league API on top of an engine.
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/clubs", post(clubs::club_new).get(clubs::list))
        .route(
            "/clubs/{code}",
            get(clubs::get).patch(clubs::update).delete(clubs::delete),
        )
        .route("/clubs/{code}/ledger", get(clubs::ledger))
        .route("/players", post(players::player_new).get(players::list))
        .route(
            "/players/{id}",
            get(players::get)
                .patch(players::update)
                .delete(players::delete),
        )
        .route("/coaches", post(coaches::coach_new).get(coaches::list))
        .route(
            "/coaches/{id}",
            get(coaches::get)
                .patch(coaches::update)
                .delete(coaches::delete),
        )
        .with_state(ServerState { engine })
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
