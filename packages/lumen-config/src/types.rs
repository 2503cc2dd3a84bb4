use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	pub search: Search,
	pub test_mode: TestMode,
}
impl Config {
	pub fn llm_api_key(&self) -> Option<&str> {
		self.providers.llm.api_key.as_deref()
	}

	pub fn search_api_key(&self) -> Option<&str> {
		self.providers.search.api_key.as_deref()
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { http_bind: "127.0.0.1:5001".to_string(), log_level: "info".to_string() }
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Providers {
	pub llm: LlmProviderConfig,
	pub search: SearchProviderConfig,
}

/// Anthropic Messages API settings used for the chat path.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmProviderConfig {
	pub api_base: String,
	pub path: String,
	/// Overridden by `CLAUDE_API_KEY` when set.
	pub api_key: Option<String>,
	pub model: String,
	pub anthropic_version: String,
	pub max_tokens: u32,
	pub temperature: f32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}
impl Default for LlmProviderConfig {
	fn default() -> Self {
		Self {
			api_base: "https://api.anthropic.com".to_string(),
			path: "/v1/messages".to_string(),
			api_key: None,
			model: "claude-3-haiku-20240307".to_string(),
			anthropic_version: "2023-06-01".to_string(),
			max_tokens: 1_500,
			temperature: 0.2,
			timeout_ms: 45_000,
			default_headers: Map::new(),
		}
	}
}

/// Chat-completions style search provider settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchProviderConfig {
	pub api_base: String,
	pub path: String,
	/// Overridden by `PERPLEXITY_API_KEY` when set.
	pub api_key: Option<String>,
	pub model: String,
	pub temperature: f32,
	pub top_p: f32,
	pub max_tokens: u32,
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}
impl Default for SearchProviderConfig {
	fn default() -> Self {
		Self {
			api_base: "https://api.perplexity.ai".to_string(),
			path: "/chat/completions".to_string(),
			api_key: None,
			model: "sonar".to_string(),
			temperature: 0.1,
			top_p: 0.9,
			max_tokens: 1_000,
			timeout_ms: 30_000,
			default_headers: Map::new(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	/// One of `sequential` or `parallel`.
	pub concurrency: String,
	/// Upper bound on in-flight sub-query calls when `concurrency = "parallel"`.
	pub max_parallel: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { concurrency: "sequential".to_string(), max_parallel: 4 }
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TestMode {
	/// Initial value of the explicit test-mode flag. Overridden by `TEST_MODE`.
	pub enabled: bool,
}
