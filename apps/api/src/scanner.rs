use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{error, info, warn};

use schedule_cell::services::ScheduleServices;
use shared_config::AppConfig;

/// Run due auto-generation rows on a fixed interval, acting with the service
/// role key. Without that key the scan is not started.
pub fn spawn(config: Arc<AppConfig>) {
    let Some(service_key) = config.supabase_service_role_key.clone() else {
        warn!("AUTO_GENERATION_SCAN_INTERVAL_SECS is set but SUPABASE_SERVICE_ROLE_KEY is missing; periodic auto-generation disabled");
        return;
    };

    let period = Duration::from_secs(config.auto_generation_scan_interval_secs);
    info!("Periodic auto-generation scan every {:?}", period);

    tokio::spawn(async move {
        let services = ScheduleServices::new(&config, Some(service_key.as_str()));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match services.auto_generation.run_due(Utc::now()).await {
                Ok(reports) if reports.is_empty() => {}
                Ok(reports) => {
                    let partial = reports.iter().filter(|r| r.result.warning.is_some()).count();
                    info!("Auto-generation scan ran {} settings ({} with warnings)", reports.len(), partial);
                }
                Err(e) => error!("Auto-generation scan failed: {}", e),
            }
        }
    });
}
