use axum::{routing::get, Router};
use registry::AppRegistry;

use crate::handler::availability::{
    primary_cabin_availability, primary_slot_availability, secondary_open_slots,
    secondary_slot_availability,
};

pub fn build_availability_routers() -> Router<AppRegistry> {
    let availability_routers = Router::new()
        .route("/primary/cabins", get(primary_cabin_availability))
        .route("/primary/slots", get(primary_slot_availability))
        .route("/secondary/slots", get(secondary_slot_availability))
        .route("/secondary/open-slots", get(secondary_open_slots));

    Router::new().nest("/availability", availability_routers)
}
