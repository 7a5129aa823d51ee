use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::join_all;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{
    AutoGenerateRequest, AutoGenerationResult, AutoGenerationRunReport, AutoGenerationSettings,
    AutoGenerationStatus, DoctorInfo, GenerationPeriod, SaveAutoGenerationRequest, ScheduleScope,
    WorkingHours,
};
use crate::services::scope::ScopeResolver;
use crate::services::settings::SettingsService;
use crate::services::slots::SlotService;
use crate::store::AutoGenerationStore;

/// Scoped, due-date driven slot generation.
#[derive(Clone)]
pub struct AutoGenerationService {
    store: Arc<dyn AutoGenerationStore>,
    scopes: ScopeResolver,
    slots: SlotService,
    settings: SettingsService,
    batch_size: usize,
}

impl AutoGenerationService {
    pub fn new(
        store: Arc<dyn AutoGenerationStore>,
        scopes: ScopeResolver,
        slots: SlotService,
        settings: SettingsService,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            scopes,
            slots,
            settings,
            batch_size: batch_size.max(1),
        }
    }

    /// Persist settings for a scope. Saving an enabled row supersedes the
    /// enabled row already holding the same scope key in the same store call;
    /// saving a disabled row is a plain insert.
    pub async fn save_settings(
        &self,
        request: SaveAutoGenerationRequest,
        created_by: Option<String>,
        now: DateTime<Utc>,
    ) -> ScheduleResult<AutoGenerationSettings> {
        let scope = request.scope.resolve()?;
        if let Some(hours) = &request.settings {
            hours.validate()?;
        }

        let is_enabled = request.is_enabled.unwrap_or(true);
        let scope_request = scope.to_request();
        let settings = AutoGenerationSettings {
            id: Uuid::new_v4(),
            is_enabled,
            status: if is_enabled {
                AutoGenerationStatus::Active
            } else {
                AutoGenerationStatus::Disabled
            },
            scope: scope.kind(),
            hospital_id: scope_request.hospital_id,
            speciality_id: scope_request.speciality_id,
            doctor_id: scope_request.doctor_id,
            scope_key: scope.key(),
            period_type: request.period_type,
            next_generation_date: request.next_generation_date.unwrap_or(now),
            created_by,
            created_at: now,
            updated_at: now,
            version: 0,
            settings: request.settings,
        };

        info!(
            "Saving {} auto-generation settings for scope {}",
            if is_enabled { "enabled" } else { "disabled" },
            settings.scope_key
        );
        self.store.supersede_and_insert(&settings).await.map_err(|e| {
            ScheduleError::from_store(
                e,
                &format!("Auto-generation settings for scope {} were saved concurrently", scope),
            )
        })
    }

    pub async fn disable(&self, id: Uuid) -> ScheduleResult<bool> {
        let disabled = self.store.disable_auto_generation(id).await?;
        if disabled {
            info!("Disabled auto-generation settings {}", id);
        }
        Ok(disabled)
    }

    pub async fn list_active(&self) -> ScheduleResult<Vec<AutoGenerationSettings>> {
        Ok(self.store.list_enabled_auto_generation().await?)
    }

    /// Generate for every doctor in the request's scope right away.
    pub async fn auto_generate(
        &self,
        request: AutoGenerateRequest,
        today: NaiveDate,
    ) -> ScheduleResult<AutoGenerationResult> {
        let scope = request.scope.resolve()?;
        if let Some(hours) = &request.settings {
            hours.validate()?;
        }

        let period = request.period_type.unwrap_or(GenerationPeriod::Month);
        let start = request.start_date.unwrap_or(today);
        let (start, end) = period
            .window(start)
            .ok_or_else(|| ScheduleError::InvalidArgument("Generation window is out of range".to_string()))?;

        let doctors = self.scopes.resolve(&scope).await?;
        Ok(self.generate_for_doctors(&scope, &doctors, request.settings.as_ref(), start, end).await)
    }

    /// Run every enabled row whose due date has passed.
    ///
    /// A row is claimed (its due date advanced under a version check) before
    /// any slots are written. Only the scan that wins the claim runs it.
    pub async fn run_due(
        &self,
        now: DateTime<Utc>,
    ) -> ScheduleResult<Vec<AutoGenerationRunReport>> {
        let due = self.store.list_due_auto_generation(now).await?;
        debug!("{} auto-generation rows are due", due.len());

        let mut reports = Vec::with_capacity(due.len());
        for row in due {
            let Some(next) = next_due_after(row.period_type, row.next_generation_date, now) else {
                error!("Cannot advance due date of auto-generation settings {}", row.id);
                continue;
            };

            let claimed = match self.store.claim_auto_generation(row.id, row.version, next).await {
                Ok(Some(claimed)) => claimed,
                Ok(None) => {
                    warn!("Auto-generation settings {} were claimed by another scan", row.id);
                    continue;
                }
                Err(e) => {
                    error!("Failed to claim auto-generation settings {}: {}", row.id, e);
                    continue;
                }
            };

            let result = self.run_row(&claimed, now.date_naive()).await;
            info!(
                "Auto-generation {} ({}): {}/{} doctors succeeded, next run at {}",
                claimed.id, claimed.scope_key, result.success_count, result.total_count, claimed.next_generation_date
            );

            reports.push(AutoGenerationRunReport {
                settings_id: claimed.id,
                scope_key: claimed.scope_key.clone(),
                next_generation_date: claimed.next_generation_date,
                result,
            });
        }

        Ok(reports)
    }

    async fn run_row(
        &self,
        row: &AutoGenerationSettings,
        today: NaiveDate,
    ) -> AutoGenerationResult {
        let (start, end) = row.period_type.window(today).unwrap_or((today, today));

        let resolved = match row.scope() {
            Ok(scope) => self.scopes.resolve(&scope).await.map(|doctors| (scope, doctors)),
            Err(e) => Err(e),
        };

        match resolved {
            Ok((scope, doctors)) => {
                self.generate_for_doctors(&scope, &doctors, row.settings.as_ref(), start, end)
                    .await
            }
            Err(e) => {
                warn!("Could not resolve scope {} for auto-generation {}: {}", row.scope_key, row.id, e);
                AutoGenerationResult {
                    total_count: 0,
                    success_count: 0,
                    generated_slots: 0,
                    failed_doctor_ids: Vec::new(),
                    window_start: start,
                    window_end: end,
                    warning: Some(format!("Scope could not be resolved: {}", e)),
                }
            }
        }
    }

    async fn generate_for_doctors(
        &self,
        scope: &ScheduleScope,
        doctors: &[DoctorInfo],
        hours: Option<&WorkingHours>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AutoGenerationResult {
        let mut success_count = 0;
        let mut generated_slots = 0;
        let mut failed_doctor_ids = Vec::new();

        for chunk in doctors.chunks(self.batch_size) {
            let outcomes = join_all(
                chunk
                    .iter()
                    .map(|doctor| self.generate_for_doctor(doctor, hours, start, end)),
            )
            .await;

            for (doctor, outcome) in chunk.iter().zip(outcomes) {
                match outcome {
                    Ok(count) => {
                        success_count += 1;
                        generated_slots += count;
                    }
                    Err(e) => {
                        warn!("Auto-generation failed for doctor {}: {}", doctor.id, e);
                        failed_doctor_ids.push(doctor.id);
                    }
                }
            }
        }

        let total_count = doctors.len();
        let warning = if total_count > 0 && success_count == 0 {
            Some(format!("No schedules were generated for scope {}", scope))
        } else if !failed_doctor_ids.is_empty() {
            Some(format!(
                "{} of {} doctors failed for scope {}",
                failed_doctor_ids.len(),
                total_count,
                scope
            ))
        } else {
            None
        };

        AutoGenerationResult {
            total_count,
            success_count,
            generated_slots,
            failed_doctor_ids,
            window_start: start,
            window_end: end,
            warning,
        }
    }

    async fn generate_for_doctor(
        &self,
        doctor: &DoctorInfo,
        hours: Option<&WorkingHours>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ScheduleResult<usize> {
        let hours = match hours {
            Some(hours) => hours.clone(),
            None => {
                self.settings
                    .effective_settings(doctor.id, doctor.hospital_id)
                    .await?
                    .ok_or_else(|| ScheduleError::NotFound(format!("Schedule settings for doctor {}", doctor.id)))?
                    .hours
            }
        };

        self.slots
            .regenerate_with(doctor.id, doctor.hospital_id, &hours, start, end)
            .await
    }
}

/// First due date after `now`, stepping from the stored due date by whole
/// periods. Missed periods are skipped, not replayed.
fn next_due_after(period: GenerationPeriod, from: DateTime<Utc>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let mut next = period.advance(from)?;
    while next <= now {
        next = period.advance(next)?;
    }
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_next_due_steps_by_period() {
        let from = Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap();
        assert_eq!(
            next_due_after(GenerationPeriod::Week, from, now),
            Some(Utc.with_ymd_and_hms(2026, 3, 9, 6, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_next_due_skips_missed_periods() {
        let from = Utc.with_ymd_and_hms(2026, 1, 5, 6, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 1, 27, 0, 0, 0).unwrap();
        assert_eq!(
            next_due_after(GenerationPeriod::Week, from, now),
            Some(Utc.with_ymd_and_hms(2026, 2, 2, 6, 0, 0).unwrap())
        );
    }
}
