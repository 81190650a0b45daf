use axum::{
    routing::{get, post},
    Router,
};
use registry::AppRegistry;

use crate::handler::reservation::{show_reservation, submit_reservation};

pub fn build_reservation_routers() -> Router<AppRegistry> {
    let reservations_routers = Router::new()
        .route("/", post(submit_reservation))
        .route("/:reservation_id", get(show_reservation));

    Router::new().nest("/reservations", reservations_routers)
}
