use axum::routing::{get, post};
use axum::Router;

pub mod public_key;
pub mod sign;
pub mod verify;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/sign", post(sign::handler))
        .route("/verify", post(verify::handler))
        .route("/public_key", get(public_key::handler))
        .with_state(state)
}
