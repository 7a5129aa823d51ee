pub mod auto_generation;
pub mod scope;
pub mod settings;
pub mod slots;
pub mod statistics;

use std::sync::Arc;

use shared_config::AppConfig;
use shared_models::appointment::StatusTaxonomy;

use crate::store::{
    AppointmentStore, AutoGenerationStore, DoctorDirectory, SettingsStore, SlotStore,
    SupabaseScheduleStore,
};

pub use auto_generation::AutoGenerationService;
pub use scope::ScopeResolver;
pub use settings::SettingsService;
pub use slots::SlotService;
pub use statistics::StatisticsService;

/// Every store trait the schedule services need, implemented by one backend.
pub trait ScheduleStore:
    SettingsStore + SlotStore + AppointmentStore + AutoGenerationStore + DoctorDirectory
{
}

impl<T> ScheduleStore for T where
    T: SettingsStore + SlotStore + AppointmentStore + AutoGenerationStore + DoctorDirectory
{
}

/// The schedule services wired to one store.
#[derive(Clone)]
pub struct ScheduleServices {
    pub settings: SettingsService,
    pub slots: SlotService,
    pub auto_generation: AutoGenerationService,
    pub statistics: StatisticsService,
}

impl ScheduleServices {
    /// Services backed by Supabase, acting with the caller's token.
    pub fn new(config: &AppConfig, auth_token: Option<&str>) -> Self {
        let store = Arc::new(SupabaseScheduleStore::new(config, auth_token));
        Self::with_store(
            store,
            StatusTaxonomy::from_config(config),
            config.auto_generation_batch_size,
        )
    }

    pub fn with_store<S>(store: Arc<S>, taxonomy: StatusTaxonomy, batch_size: usize) -> Self
    where
        S: ScheduleStore + 'static,
    {
        let settings = SettingsService::new(store.clone());
        let scopes = ScopeResolver::new(store.clone());
        let slots = SlotService::new(store.clone(), store.clone(), settings.clone());
        let auto_generation = AutoGenerationService::new(
            store.clone(),
            scopes.clone(),
            slots.clone(),
            settings.clone(),
            batch_size,
        );
        let statistics = StatisticsService::new(store.clone(), store, scopes, taxonomy);

        Self {
            settings,
            slots,
            auto_generation,
            statistics,
        }
    }
}
