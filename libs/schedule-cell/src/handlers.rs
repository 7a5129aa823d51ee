use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::{NaiveDate, Utc};
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    AutoGenerateRequest, CreateTimeSlotRequest, DateRangeRequest, SaveAutoGenerationRequest,
    SaveScheduleSettingsRequest, StatisticsPeriod, StatisticsRequest, UpdateTimeSlotRequest,
};
use crate::services::ScheduleServices;

#[derive(Debug, Deserialize)]
pub struct AvailabilityStatisticsQuery {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct OccupancyQuery {
    pub period: Option<StatisticsPeriod>,
    pub start_from_today: Option<bool>,
}

fn services(state: &AppConfig, auth: &Authorization<Bearer>) -> ScheduleServices {
    ScheduleServices::new(state, Some(auth.token()))
}

// ==============================================================================
// SETTINGS & SLOTS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_doctor_settings(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let settings = services(&state, &auth)
        .settings
        .get_doctor_settings(doctor_id)
        .await?;

    Ok(Json(json!(settings)))
}

#[axum::debug_handler]
pub async fn save_settings(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<SaveScheduleSettingsRequest>,
) -> Result<Json<Value>, AppError> {
    let settings = services(&state, &auth).settings.save_settings(request).await?;

    Ok(Json(json!(settings)))
}

#[axum::debug_handler]
pub async fn generate_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(range): Json<DateRangeRequest>,
) -> Result<Json<Value>, AppError> {
    let success = services(&state, &auth)
        .slots
        .generate_schedule(doctor_id, range.start_date, range.end_date)
        .await?;

    Ok(Json(json!({
        "success": success,
        "doctor_id": doctor_id,
        "start_date": range.start_date,
        "end_date": range.end_date,
    })))
}

#[axum::debug_handler]
pub async fn clear_schedule(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(range): Query<DateRangeRequest>,
) -> Result<Json<Value>, AppError> {
    let deleted = services(&state, &auth)
        .slots
        .clear_schedule(doctor_id, range.start_date, range.end_date)
        .await?;

    Ok(Json(json!({ "deleted": deleted })))
}

#[axum::debug_handler]
pub async fn get_doctor_slots(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(range): Query<DateRangeRequest>,
) -> Result<Json<Value>, AppError> {
    let slots = services(&state, &auth)
        .slots
        .get_doctor_slots(doctor_id, range.start_date, range.end_date)
        .await?;

    Ok(Json(json!({
        "slots": slots,
        "total": slots.len(),
    })))
}

#[axum::debug_handler]
pub async fn create_slot(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateTimeSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let slot = services(&state, &auth).slots.create_slot(request).await?;

    Ok(Json(json!(slot)))
}

#[axum::debug_handler]
pub async fn update_slot(
    State(state): State<Arc<AppConfig>>,
    Path(slot_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<UpdateTimeSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let slot = services(&state, &auth)
        .slots
        .update_slot(slot_id, request.is_available)
        .await?;

    Ok(Json(json!(slot)))
}

// ==============================================================================
// AUTO-GENERATION
// ==============================================================================

#[axum::debug_handler]
pub async fn auto_generate(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<AutoGenerateRequest>,
) -> Result<Json<Value>, AppError> {
    let result = services(&state, &auth)
        .auto_generation
        .auto_generate(request, Utc::now().date_naive())
        .await?;

    Ok(Json(json!(result)))
}

#[axum::debug_handler]
pub async fn save_auto_generation(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<SaveAutoGenerationRequest>,
) -> Result<Json<Value>, AppError> {
    let settings = services(&state, &auth)
        .auto_generation
        .save_settings(request, Some(user.id), Utc::now())
        .await?;

    Ok(Json(json!(settings)))
}

#[axum::debug_handler]
pub async fn disable_auto_generation(
    State(state): State<Arc<AppConfig>>,
    Path(settings_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let disabled = services(&state, &auth)
        .auto_generation
        .disable(settings_id)
        .await?;

    Ok(Json(json!({ "success": disabled })))
}

#[axum::debug_handler]
pub async fn list_auto_generation(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let settings = services(&state, &auth).auto_generation.list_active().await?;

    Ok(Json(json!({
        "settings": settings,
        "total": settings.len(),
    })))
}

#[axum::debug_handler]
pub async fn run_due_auto_generation(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let reports = services(&state, &auth)
        .auto_generation
        .run_due(Utc::now())
        .await?;

    Ok(Json(json!({
        "processed": reports.len(),
        "reports": reports,
    })))
}

// ==============================================================================
// STATISTICS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_schedule_statistics(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<StatisticsRequest>,
) -> Result<Json<Value>, AppError> {
    let statistics = services(&state, &auth)
        .statistics
        .get_schedule_statistics(&request, Utc::now().date_naive())
        .await?;

    Ok(Json(json!(statistics)))
}

#[axum::debug_handler]
pub async fn get_slot_availability_statistics(
    State(state): State<Arc<AppConfig>>,
    Path(doctor_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<AvailabilityStatisticsQuery>,
) -> Result<Json<Value>, AppError> {
    let statistics = services(&state, &auth)
        .statistics
        .get_slot_availability_statistics(doctor_id, query.from_date, query.to_date)
        .await?;

    Ok(Json(json!(statistics)))
}

#[axum::debug_handler]
pub async fn get_hospital_occupancy_statistics(
    State(state): State<Arc<AppConfig>>,
    Path(hospital_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<OccupancyQuery>,
) -> Result<Json<Value>, AppError> {
    let statistics = services(&state, &auth)
        .statistics
        .get_hospital_occupancy_statistics(
            hospital_id,
            query.period,
            query.start_from_today.unwrap_or(false),
            Utc::now().date_naive(),
        )
        .await?;

    Ok(Json(json!(statistics)))
}
