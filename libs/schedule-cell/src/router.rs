use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn schedule_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        // Settings and slots
        .route("/settings", put(handlers::save_settings))
        .route("/doctors/{doctor_id}/settings", get(handlers::get_doctor_settings))
        .route("/doctors/{doctor_id}/generate", post(handlers::generate_schedule))
        .route(
            "/doctors/{doctor_id}/slots",
            get(handlers::get_doctor_slots).delete(handlers::clear_schedule),
        )
        .route("/slots", post(handlers::create_slot))
        .route("/slots/{slot_id}", patch(handlers::update_slot))

        // Auto-generation
        .route("/auto-generate", post(handlers::auto_generate))
        .route(
            "/auto-generation",
            get(handlers::list_auto_generation).post(handlers::save_auto_generation),
        )
        .route("/auto-generation/run-due", post(handlers::run_due_auto_generation))
        .route("/auto-generation/{settings_id}/disable", post(handlers::disable_auto_generation))

        // Statistics
        .route("/statistics", post(handlers::get_schedule_statistics))
        .route(
            "/statistics/doctors/{doctor_id}/availability",
            get(handlers::get_slot_availability_statistics),
        )
        .route(
            "/statistics/hospitals/{hospital_id}/occupancy",
            get(handlers::get_hospital_occupancy_statistics),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
