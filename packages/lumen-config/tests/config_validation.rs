use std::{
	collections::HashMap,
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use lumen_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_toml_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let mut table = root.as_table_mut().expect("Sample config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{section}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("lumen_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> lumen_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = lumen_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

#[test]
fn sample_config_loads() {
	let cfg = load_payload(SAMPLE_CONFIG_TOML.to_string()).expect("Sample config must load.");

	assert_eq!(cfg.providers.search.model, "sonar");
	assert_eq!(cfg.providers.llm.max_tokens, 1_500);
	assert_eq!(cfg.search.concurrency, "sequential");
	assert!(!cfg.test_mode.enabled);
	assert!(cfg.llm_api_key().is_none());
}

#[test]
fn sample_provider_sections_hold_only_read_keys() {
	let root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let keys = |section: &str| -> Vec<String> {
		let mut keys: Vec<String> = root
			.get("providers")
			.and_then(|providers| providers.get(section))
			.and_then(Value::as_table)
			.map(|table| table.keys().cloned().collect())
			.unwrap_or_default();

		keys.sort();

		keys
	};

	assert_eq!(
		keys("llm"),
		[
			"anthropic_version",
			"api_base",
			"default_headers",
			"max_tokens",
			"model",
			"path",
			"temperature",
			"timeout_ms",
		]
	);
	assert_eq!(
		keys("search"),
		[
			"api_base",
			"default_headers",
			"max_tokens",
			"model",
			"path",
			"temperature",
			"timeout_ms",
			"top_p",
		]
	);
}

#[test]
fn empty_config_uses_defaults() {
	let cfg = lumen_config::parse("").expect("Empty config must fall back to defaults.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:5001");
	assert_eq!(cfg.providers.search.path, "/chat/completions");
	assert_eq!(cfg.providers.llm.anthropic_version, "2023-06-01");
	assert_eq!(cfg.search.max_parallel, 4);
}

#[test]
fn missing_file_reports_path() {
	let path = env::temp_dir().join("lumen_config_test_does_not_exist.toml");
	let err = lumen_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn concurrency_must_be_known() {
	let payload = sample_toml_with("search", "concurrency", Value::String("fanout".to_string()));
	let err = load_payload(payload).expect_err("Expected concurrency validation error.");

	assert!(
		err.to_string().contains("search.concurrency must be one of sequential or parallel."),
		"Unexpected error: {err}"
	);
}

#[test]
fn concurrency_is_normalized_before_validation() {
	let payload =
		sample_toml_with("search", "concurrency", Value::String(" Parallel ".to_string()));
	let cfg = load_payload(payload).expect("Mixed-case concurrency must be accepted.");

	assert_eq!(cfg.search.concurrency, "parallel");
}

#[test]
fn max_parallel_must_be_positive() {
	let payload = sample_toml_with("search", "max_parallel", Value::Integer(0));
	let err = load_payload(payload).expect_err("Expected max_parallel validation error.");

	assert!(
		err.to_string().contains("search.max_parallel must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn top_p_must_be_in_range() {
	let payload = sample_toml_with("providers.search", "top_p", Value::Float(1.5));
	let err = load_payload(payload).expect_err("Expected top_p validation error.");

	assert!(err.to_string().contains("providers.search.top_p"), "Unexpected error: {err}");
}

#[test]
fn llm_temperature_must_be_in_range() {
	let payload = sample_toml_with("providers.llm", "temperature", Value::Float(1.2));
	let err = load_payload(payload).expect_err("Expected temperature validation error.");

	assert!(
		err.to_string().contains("providers.llm.temperature must be in the range 0.0-1.0."),
		"Unexpected error: {err}"
	);
}

#[test]
fn default_header_values_must_be_strings() {
	let mut root: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let headers = root
		.get_mut("providers")
		.and_then(|providers| providers.get_mut("search"))
		.and_then(|search| search.get_mut("default_headers"))
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [providers.search.default_headers].");

	headers.insert("x-retries".to_string(), Value::Integer(3));

	let payload = toml::to_string(&root).expect("Failed to render sample config.");
	let err = load_payload(payload).expect_err("Expected default header validation error.");

	assert!(
		err.to_string().contains("providers.search.default_headers values must be strings."),
		"Unexpected error: {err}"
	);
}

#[test]
fn blank_api_keys_are_treated_as_missing() {
	let payload = sample_toml_with("providers.llm", "api_key", Value::String("   ".to_string()));
	let cfg = load_payload(payload).expect("Blank key must be accepted.");

	assert!(cfg.llm_api_key().is_none());
}

#[test]
fn env_overlay_sets_credentials_and_test_mode() {
	let vars = HashMap::from([
		(lumen_config::ENV_LLM_API_KEY, "claude-key".to_string()),
		(lumen_config::ENV_SEARCH_API_KEY, "  ".to_string()),
		(lumen_config::ENV_TEST_MODE, "TRUE".to_string()),
	]);
	let mut cfg = Config::default();

	lumen_config::apply_env_with(&mut cfg, |key| vars.get(key).cloned());

	assert_eq!(cfg.llm_api_key(), Some("claude-key"));
	assert!(cfg.search_api_key().is_none());
	assert!(cfg.test_mode.enabled);
}

#[test]
fn env_overlay_can_disable_test_mode() {
	let mut cfg = Config::default();

	cfg.test_mode.enabled = true;

	lumen_config::apply_env_with(&mut cfg, |key| {
		(key == lumen_config::ENV_TEST_MODE).then(|| "false".to_string())
	});

	assert!(!cfg.test_mode.enabled);
}
