use axum::routing::{get, post};
use axum::Router;

mod index;
mod receive;
mod sign;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(index::handler))
        .route("/sign_and_get_details", post(sign::handler))
        .route("/receive", post(receive::handler))
        .with_state(state)
}
