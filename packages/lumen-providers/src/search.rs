use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::{AuthScheme, Error, Result};
use lumen_config::SearchProviderConfig;

/// One search completion. `content` is `None` when the provider returned no choices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchCompletion {
	pub id: Option<String>,
	pub content: Option<String>,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
	model: &'a str,
	messages: [CompletionMessage<'a>; 2],
	temperature: f32,
	top_p: f32,
	max_tokens: u32,
}

#[derive(Serialize)]
struct CompletionMessage<'a> {
	role: &'static str,
	content: &'a str,
}

pub async fn complete(
	cfg: &SearchProviderConfig,
	system: &str,
	query: &str,
) -> Result<SearchCompletion> {
	let api_key = crate::require_key(cfg.api_key.as_deref(), "search")?;
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = CompletionRequest {
		model: &cfg.model,
		messages: [
			CompletionMessage { role: "system", content: system },
			CompletionMessage { role: "user", content: query },
		],
		temperature: cfg.temperature,
		top_p: cfg.top_p,
		max_tokens: cfg.max_tokens,
	};
	let res = client
		.post(url)
		.headers(crate::auth_headers(AuthScheme::Bearer, api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion(json)
}

fn parse_completion(json: Value) -> Result<SearchCompletion> {
	let id = json.get("id").and_then(Value::as_str).map(str::to_string);
	let choices = json.get("choices").and_then(Value::as_array).ok_or_else(|| {
		Error::InvalidResponse { message: "Search response is missing choices array.".to_string() }
	})?;
	let Some(choice) = choices.first() else {
		return Ok(SearchCompletion { id, content: None });
	};
	let content = choice
		.get("message")
		.and_then(|message| message.get("content"))
		.and_then(Value::as_str)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Search choice is missing message content.".to_string(),
		})?;

	Ok(SearchCompletion { id, content: Some(content.to_string()) })
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_first_choice_content() {
		let json = serde_json::json!({
			"id": "cmpl-1",
			"choices": [
				{ "message": { "role": "assistant", "content": "Ответ." } },
				{ "message": { "role": "assistant", "content": "Игнорируется." } }
			]
		});
		let completion = parse_completion(json).expect("parse failed");

		assert_eq!(completion.id.as_deref(), Some("cmpl-1"));
		assert_eq!(completion.content.as_deref(), Some("Ответ."));
	}

	#[test]
	fn empty_choices_yield_no_content() {
		let completion =
			parse_completion(serde_json::json!({ "choices": [] })).expect("parse failed");

		assert_eq!(completion, SearchCompletion { id: None, content: None });
	}

	#[test]
	fn malformed_shapes_are_rejected() {
		assert!(parse_completion(serde_json::json!({ "error": "quota" })).is_err());
		assert!(
			parse_completion(serde_json::json!({ "choices": [{ "message": {} }] })).is_err()
		);
	}
}
