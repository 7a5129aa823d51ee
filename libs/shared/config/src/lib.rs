use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_jwt_secret: String,
    pub supabase_service_role_key: Option<String>,
    pub bind_addr: String,
    pub appointment_status_completed_id: i32,
    pub appointment_status_waiting_id: i32,
    pub appointment_status_cancelled_id: i32,
    pub auto_generation_batch_size: usize,
    pub auto_generation_scan_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: String::new(),
            supabase_anon_key: String::new(),
            supabase_jwt_secret: String::new(),
            supabase_service_role_key: None,
            bind_addr: "0.0.0.0:3000".to_string(),
            appointment_status_completed_id: 2,
            appointment_status_waiting_id: 4,
            appointment_status_cancelled_id: 5,
            auto_generation_batch_size: 25,
            auto_generation_scan_interval_secs: 0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_JWT_SECRET not set, using empty value");
                    String::new()
                }),
            supabase_service_role_key: env::var("SUPABASE_SERVICE_ROLE_KEY").ok(),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            appointment_status_completed_id: parse_var(
                "APPOINTMENT_STATUS_COMPLETED_ID",
                defaults.appointment_status_completed_id,
            ),
            appointment_status_waiting_id: parse_var(
                "APPOINTMENT_STATUS_WAITING_ID",
                defaults.appointment_status_waiting_id,
            ),
            appointment_status_cancelled_id: parse_var(
                "APPOINTMENT_STATUS_CANCELLED_ID",
                defaults.appointment_status_cancelled_id,
            ),
            auto_generation_batch_size: parse_var(
                "AUTO_GENERATION_BATCH_SIZE",
                defaults.auto_generation_batch_size,
            )
            .max(1),
            auto_generation_scan_interval_secs: parse_var(
                "AUTO_GENERATION_SCAN_INTERVAL_SECS",
                defaults.auto_generation_scan_interval_secs,
            ),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
            && !self.supabase_jwt_secret.is_empty()
    }

    /// Periodic auto-generation runs only when an interval is configured.
    pub fn is_auto_generation_scan_enabled(&self) -> bool {
        self.auto_generation_scan_interval_secs > 0
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}
