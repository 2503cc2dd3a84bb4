mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, LlmProviderConfig, Providers, Search, SearchProviderConfig, Service, TestMode,
};

use std::{env, fs, path::Path};

pub const ENV_LLM_API_KEY: &str = "CLAUDE_API_KEY";
pub const ENV_SEARCH_API_KEY: &str = "PERPLEXITY_API_KEY";
pub const ENV_TEST_MODE: &str = "TEST_MODE";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw).map_err(|err| Error::ParseInline { source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

/// Overlays credentials and the test-mode override from the process environment.
pub fn apply_env(cfg: &mut Config) {
	apply_env_with(cfg, |key| env::var(key).ok());
}

pub fn apply_env_with<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(key) = lookup(ENV_LLM_API_KEY) {
		cfg.providers.llm.api_key = Some(key);
	}
	if let Some(key) = lookup(ENV_SEARCH_API_KEY) {
		cfg.providers.search.api_key = Some(key);
	}
	if let Some(raw) = lookup(ENV_TEST_MODE) {
		cfg.test_mode.enabled = raw.trim().eq_ignore_ascii_case("true");
	}

	normalize(cfg);
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	for (label, api_base, model) in [
		("llm", &cfg.providers.llm.api_base, &cfg.providers.llm.model),
		("search", &cfg.providers.search.api_base, &cfg.providers.search.model),
	] {
		if api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("providers.{label}.api_base must be non-empty."),
			});
		}
		if model.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("providers.{label}.model must be non-empty."),
			});
		}
	}

	if cfg.providers.llm.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.llm.max_tokens must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.search.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.search.max_tokens must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.llm.timeout_ms == 0 || cfg.providers.search.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers timeout_ms must be greater than zero.".to_string(),
		});
	}

	let llm_temperature = cfg.providers.llm.temperature;

	if !llm_temperature.is_finite() || !(0.0..=1.0).contains(&llm_temperature) {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be in the range 0.0-1.0.".to_string(),
		});
	}

	let search_temperature = cfg.providers.search.temperature;

	if !search_temperature.is_finite() || !(0.0..2.0).contains(&search_temperature) {
		return Err(Error::Validation {
			message: "providers.search.temperature must be in the range 0.0-2.0 (exclusive)."
				.to_string(),
		});
	}

	let top_p = cfg.providers.search.top_p;

	if !top_p.is_finite() || top_p <= 0.0 || top_p > 1.0 {
		return Err(Error::Validation {
			message: "providers.search.top_p must be greater than zero and at most 1.0."
				.to_string(),
		});
	}
	if !matches!(cfg.search.concurrency.as_str(), "sequential" | "parallel") {
		return Err(Error::Validation {
			message: "search.concurrency must be one of sequential or parallel.".to_string(),
		});
	}
	if cfg.search.max_parallel == 0 {
		return Err(Error::Validation {
			message: "search.max_parallel must be greater than zero.".to_string(),
		});
	}

	for (label, headers) in [
		("llm", &cfg.providers.llm.default_headers),
		("search", &cfg.providers.search.default_headers),
	] {
		if headers.values().any(|value| !value.is_string()) {
			return Err(Error::Validation {
				message: format!("providers.{label}.default_headers values must be strings."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.providers.llm.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.providers.llm.api_key = None;
	}
	if cfg.providers.search.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false)
	{
		cfg.providers.search.api_key = None;
	}

	cfg.search.concurrency = cfg.search.concurrency.trim().to_ascii_lowercase();
}
