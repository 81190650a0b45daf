use axum::{
    routing::{delete, get, put},
    Router,
};
use registry::AppRegistry;

use crate::handler::{
    reservation::{delete_reservation, show_reservation_list},
    schedule::{show_schedule, update_locations, update_service_schedule},
};

pub fn build_admin_routers() -> Router<AppRegistry> {
    let admin_routers = Router::new()
        .route("/reservations", get(show_reservation_list))
        .route("/reservations/:reservation_id", delete(delete_reservation))
        .route("/schedule", get(show_schedule))
        .route("/schedule/:service_kind", put(update_service_schedule))
        .route("/locations", put(update_locations));

    Router::new().nest("/admin", admin_routers)
}
