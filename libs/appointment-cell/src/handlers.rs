use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::CreateAppointmentFromSlotRequest;
use crate::services::SlotBindingService;

#[axum::debug_handler]
pub async fn create_from_slot(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateAppointmentFromSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let service = SlotBindingService::new(&state, Some(auth.token()));
    let appointment = service.create_from_slot(request).await?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = SlotBindingService::new(&state, Some(auth.token()));
    let deleted = service.delete_appointment(appointment_id).await?;

    Ok(Json(json!({
        "success": true,
        "appointment_id": deleted.appointment_id,
        "released_slot_id": deleted.released_slot_id,
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = SlotBindingService::new(&state, Some(auth.token()));
    let appointment = service.cancel_appointment(appointment_id).await?;

    Ok(Json(json!(appointment)))
}
