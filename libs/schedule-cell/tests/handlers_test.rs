// libs/schedule-cell/tests/handlers_test.rs

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schedule_cell::handlers::*;
use schedule_cell::models::*;
use schedule_cell::router::schedule_routes;
use shared_models::error::AppError;
use shared_utils::test_utils::{JwtTestUtils, MockSupabaseResponses, TestConfig, TestUser};

fn create_auth_header(token: &str) -> TypedHeader<Authorization<Bearer>> {
    TypedHeader(Authorization::bearer(token).unwrap())
}

#[tokio::test]
async fn test_routes_require_bearer_token() {
    let app = schedule_routes(TestConfig::default().to_arc());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auto-generation")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_routes_reject_expired_token() {
    let config = TestConfig::default();
    let token = JwtTestUtils::create_expired_token(&TestUser::admin("admin@example.com"), &config.jwt_secret);
    let app = schedule_routes(config.to_arc());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/auto-generation")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_auto_generation_through_router() {
    let server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&server.uri());
    let token = JwtTestUtils::create_test_token(&TestUser::admin("admin@example.com"), &config.jwt_secret, None);

    Mock::given(method("GET"))
        .and(path("/rest/v1/auto_generation_settings"))
        .and(query_param("is_enabled", "eq.true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let response = schedule_routes(config.to_arc())
        .oneshot(
            Request::builder()
                .uri("/auto-generation")
                .header("Authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_doctor_settings_not_found() {
    let server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&server.uri()).to_arc();

    Mock::given(method("GET"))
        .and(path("/rest/v1/schedule_settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = get_doctor_settings(State(config), Path(Uuid::new_v4()), create_auth_header("token")).await;
    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn test_get_doctor_slots_returns_total() {
    let server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&server.uri()).to_arc();
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/time_slots"))
        .and(query_param("doctor_id", format!("in.({})", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::time_slot_response(&Uuid::new_v4().to_string(), &doctor_id.to_string(), true),
            MockSupabaseResponses::time_slot_response(&Uuid::new_v4().to_string(), &doctor_id.to_string(), false),
        ])))
        .mount(&server)
        .await;

    let range = DateRangeRequest {
        start_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        end_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 8).unwrap(),
    };
    let Json(body) = get_doctor_slots(State(config), Path(doctor_id), create_auth_header("token"), Query(range))
        .await
        .unwrap();

    assert_eq!(body["total"], 2);
    assert_eq!(body["slots"][1]["is_available"], false);
}

#[tokio::test]
async fn test_update_missing_slot_is_not_found() {
    let server = MockServer::start().await;
    let config = TestConfig::with_supabase_url(&server.uri()).to_arc();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/time_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = update_slot(
        State(config),
        Path(Uuid::new_v4()),
        create_auth_header("token"),
        Json(UpdateTimeSlotRequest { is_available: true }),
    )
    .await;
    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn test_statistics_rejects_reversed_dates() {
    let config = Arc::new(TestConfig::default().to_app_config());
    let request = StatisticsRequest {
        scope: ScopeRequest {
            scope: ScopeKind::AllDoctors,
            hospital_id: None,
            speciality_id: None,
            doctor_id: None,
        },
        from_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 10),
        to_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 1),
        period: None,
        start_from_today: false,
    };

    let result = get_schedule_statistics(State(config), create_auth_header("token"), Json(request)).await;
    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_auto_generate_missing_scope_id_is_bad_request() {
    let config = TestConfig::default().to_arc();
    let request: AutoGenerateRequest = serde_json::from_value(json!({ "scope": "selectedHospital" })).unwrap();

    let result = auto_generate(State(config), create_auth_header("token"), Json(request)).await;
    assert_matches!(result, Err(AppError::BadRequest(_)));
}
