// libs/schedule-cell/tests/supabase_store_test.rs
// PostgREST request shapes of the Supabase-backed store.

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schedule_cell::models::*;
use schedule_cell::store::{AutoGenerationStore, DoctorDirectory, SettingsStore, SlotStore, SupabaseScheduleStore};
use shared_database::SupabaseError;
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

const TOKEN: &str = "user-token";

fn store_for(server: &MockServer) -> SupabaseScheduleStore {
    let config = TestConfig::with_supabase_url(&server.uri()).to_app_config();
    SupabaseScheduleStore::new(&config, Some(TOKEN))
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[tokio::test]
async fn test_find_doctor_settings_forwards_token() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let settings_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/schedule_settings"))
        .and(query_param("doctor_id", format!("eq.{}", doctor_id)))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(header("apikey", "test-anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::schedule_settings_response(&settings_id.to_string(), &doctor_id.to_string())
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let settings = store_for(&server)
        .find_settings(SettingsKey::Doctor(doctor_id))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(settings.id, settings_id);
    assert_eq!(settings.hours.work_days, vec![1, 2, 3, 4, 5]);
    assert_eq!(settings.hours.work_day_end, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
}

#[tokio::test]
async fn test_global_settings_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/schedule_settings"))
        .and(query_param("doctor_id", "is.null"))
        .and(query_param("hospital_id", "is.null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(store_for(&server).find_settings(SettingsKey::Global).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_slots_filters_range_and_doctors() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/time_slots"))
        .and(query_param("slot_date", "gte.2026-03-01"))
        .and(query_param("slot_date", "lte.2026-03-31"))
        .and(query_param("doctor_id", format!("in.({})", doctor_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::time_slot_response(&slot_id.to_string(), &doctor_id.to_string(), true)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let slots = store_for(&server)
        .list_slots(&RangeQuery::for_doctor(doctor_id, d(2026, 3, 1), d(2026, 3, 31)))
        .await
        .unwrap();

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].id, slot_id);
    assert_eq!(slots[0].slot_date, d(2026, 3, 2));
}

#[tokio::test]
async fn test_empty_doctor_list_skips_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let query = RangeQuery { doctor_ids: Some(vec![]), from: d(2026, 3, 1), to: d(2026, 3, 31) };
    assert!(store_for(&server).list_slots(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_flip_is_conditional_on_current_state() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();
    let slot_id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/time_slots"))
        .and(query_param("id", format!("eq.{}", slot_id)))
        .and(query_param("is_available", "eq.true"))
        .and(header("prefer", "return=representation"))
        .and(body_partial_json(json!({ "is_available": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::time_slot_response(&slot_id.to_string(), &doctor_id.to_string(), false)
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    // Once the row is unavailable the filter matches nothing.
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/time_slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let flipped = store.flip_availability(slot_id, false).await.unwrap();
    assert_eq!(flipped.map(|s| s.is_available), Some(false));
    assert!(store.flip_availability(slot_id, false).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_slot_insert_is_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/time_slots"))
        .respond_with(ResponseTemplate::new(409).set_body_json(MockSupabaseResponses::error_response(
            "duplicate key value violates unique constraint",
            "23505",
        )))
        .mount(&server)
        .await;

    let slot = NewTimeSlot {
        doctor_id: Uuid::new_v4(),
        hospital_id: None,
        slot_date: d(2026, 3, 2),
        slot_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        duration: 30,
        is_available: true,
    };
    let err = store_for(&server).insert_slots(&[slot]).await.unwrap_err();
    assert!(SupabaseError::is_conflict(&err));
}

#[tokio::test]
async fn test_bulk_insert_is_chunked() {
    let server = MockServer::start().await;
    let doctor_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/rest/v1/time_slots"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(3)
        .mount(&server)
        .await;

    let start = d(2026, 1, 1);
    let slots: Vec<NewTimeSlot> = start
        .iter_days()
        .take(1200)
        .map(|slot_date| NewTimeSlot {
            doctor_id,
            hospital_id: None,
            slot_date,
            slot_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            duration: 30,
            is_available: true,
        })
        .collect();

    store_for(&server).insert_slots(&slots).await.unwrap();
}

#[tokio::test]
async fn test_supersession_goes_through_rpc() {
    let server = MockServer::start().await;
    let hospital_id = Uuid::new_v4();
    let now = Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap();
    let scope = ScheduleScope::Hospital(hospital_id);

    let settings = AutoGenerationSettings {
        id: Uuid::new_v4(),
        is_enabled: true,
        status: AutoGenerationStatus::Active,
        scope: scope.kind(),
        hospital_id: Some(hospital_id),
        speciality_id: None,
        doctor_id: None,
        scope_key: scope.key(),
        period_type: GenerationPeriod::Week,
        next_generation_date: now,
        created_by: None,
        created_at: now,
        updated_at: now,
        version: 0,
        settings: None,
    };

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/supersede_auto_generation_settings"))
        .and(body_partial_json(json!({
            "new_settings": { "scope": "selectedHospital", "scope_key": scope.key(), "period_type": "week" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([settings])))
        .expect(1)
        .mount(&server)
        .await;

    let saved = store_for(&server).supersede_and_insert(&settings).await.unwrap();
    assert_eq!(saved, settings);
}

#[tokio::test]
async fn test_claim_checks_version() {
    let server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/auto_generation_settings"))
        .and(query_param("id", format!("eq.{}", id)))
        .and(query_param("version", "eq.3"))
        .and(query_param("is_enabled", "eq.true"))
        .and(body_partial_json(json!({ "version": 4, "next_generation_date": "2026-03-09T06:00:00Z" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let next = Utc.with_ymd_and_hms(2026, 3, 9, 6, 0, 0).unwrap();
    assert!(store_for(&server).claim_auto_generation(id, 3, next).await.unwrap().is_none());
}

#[tokio::test]
async fn test_all_hospitals_filter_skips_unattached_doctors() {
    let server = MockServer::start().await;
    let hospital_id = Uuid::new_v4();
    let doctor_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/doctors"))
        .and(query_param("hospital_id", "not.is.null"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::doctor_response(&doctor_id.to_string(), Some(&hospital_id.to_string()))
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let filter = DoctorFilter { require_hospital: true, ..DoctorFilter::default() };
    let doctors = store_for(&server).list_doctors(&filter).await.unwrap();
    assert_eq!(doctors, vec![DoctorInfo { id: doctor_id, hospital_id: Some(hospital_id), speciality_id: None }]);
}
