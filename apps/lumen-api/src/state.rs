use std::sync::Arc;

use lumen_config::Config;
use lumen_service::{LumenService, Providers};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LumenService>,
}
impl AppState {
	pub fn new(config: Config) -> Self {
		Self::with_providers(config, Providers::default())
	}

	pub fn with_providers(config: Config, providers: Providers) -> Self {
		Self { service: Arc::new(LumenService::with_providers(config, providers)) }
	}
}
