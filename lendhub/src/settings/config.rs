use config::{Config, ConfigError, Environment, File};
use lendhub_core::settings::{
    api_server::ApiServer, notification_services::NotificationServiceSettings,
    retention::RetentionSettings, scheduler_interval::SchedulerInterval,
};
use lendhub_core::notification_types::NotificationReceiver;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct Scheduler {
    pub overdue_check: SchedulerInterval,
    pub retention_check: SchedulerInterval,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
pub struct Settings {
    pub debug: bool,
    pub telemetry: Option<String>,
    pub api: ApiServer,
    pub scheduler: Scheduler,
    pub retention: RetentionSettings,
    /// Path of the YAML file holding roles and assignments
    pub authorization_config: String,
    #[serde(default)]
    pub notification_services: NotificationServiceSettings,
    /// Receivers every domain notification is dispatched to
    #[serde(default = "default_notification_receivers")]
    pub notification_receivers: Vec<NotificationReceiver>,
}

fn default_notification_receivers() -> Vec<NotificationReceiver> {
    vec![NotificationReceiver::Log]
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            debug: false,
            telemetry: None,
            api: ApiServer::default(),
            scheduler: Scheduler {
                overdue_check: SchedulerInterval::Minutes(5),
                retention_check: SchedulerInterval::Hours(1),
            },
            retention: RetentionSettings::default(),
            authorization_config: "config/authorization.yaml".to_string(),
            notification_services: NotificationServiceSettings::default(),
            notification_receivers: default_notification_receivers(),
        }
    }
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("LENDHUB")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("LENDHUB_RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("debug", false)?
            .set_default("api.bind_address", "0.0.0.0:8080")?
            .set_default("scheduler.overdue_check", "5m")?
            .set_default("scheduler.retention_check", "1h")?
            .set_default("retention.closed_loan_days", 90u32)?
            .set_default("authorization_config", "config/authorization.yaml")?
            // Start off by merging in the "default" configuration file
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment());

        let s = builder.build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert!(!settings.debug);
        assert_eq!(settings.retention.closed_loan_days, 90);
        assert_eq!(
            settings.notification_receivers,
            vec![NotificationReceiver::Log]
        );
    }
}
