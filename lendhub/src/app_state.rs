use std::sync::Arc;

use tracing::{info, warn};

use crate::services::AuthorizationService;
use crate::settings::config::Settings;
use crate::stop_flag;
use lendhub_core::inventory::shared_inventory::{SharedBundles, SharedInventory};
use lendhub_core::loans::shared_loan_book::SharedLoanBook;
use lendhub_core::locations::shared_locations::SharedLocations;

#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Settings,
    pub stop_flag: stop_flag::StopFlag,
    pub locations: SharedLocations,
    pub inventory: SharedInventory,
    pub bundles: SharedBundles,
    pub loans: SharedLoanBook,
    pub auth_service: Arc<AuthorizationService>,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub async fn new() -> anyhow::Result<SharedAppState> {
        let settings = Settings::new()?;

        let stop_flag = stop_flag::StopFlag::new();
        stop_flag::register_signal_handler(&stop_flag);

        let auth_service = Arc::new(
            match AuthorizationService::new(&settings.authorization_config).await {
                Ok(service) => {
                    info!("Authorization service loaded successfully from config");
                    service
                }
                Err(e) => {
                    warn!(
                        "Failed to load authorization config from '{}': {}. Falling back to default configuration.",
                        settings.authorization_config, e
                    );
                    AuthorizationService::with_default_config(
                        settings.api.dev_user_email.clone(),
                    )
                }
            },
        );

        Ok(Arc::new(AppState {
            settings,
            stop_flag: stop_flag.clone(),
            locations: SharedLocations::new(),
            inventory: SharedInventory::new(),
            bundles: SharedBundles::new(),
            loans: SharedLoanBook::new(),
            auth_service,
        }))
    }

    pub async fn new_for_config_only() -> anyhow::Result<SharedAppState> {
        let settings = Settings::new()?;

        Ok(Arc::new(AppState {
            settings,
            stop_flag: stop_flag::StopFlag::new(),
            locations: SharedLocations::new(),
            inventory: SharedInventory::new(),
            bundles: SharedBundles::new(),
            loans: SharedLoanBook::new(),
            auth_service: Arc::new(AuthorizationService::with_default_config(None)),
        }))
    }
}
