//! Anthropic Messages API client. Replies are streamed as server-sent events and decoded into
//! plain text deltas.

use std::{collections::VecDeque, pin::Pin, time::Duration};

use futures::{Stream, StreamExt, stream};
use reqwest::{
	Client,
	header::{HeaderName, HeaderValue},
};
use serde::Serialize;
use serde_json::Value;

use crate::{AuthScheme, Error, Result};
use lumen_config::LlmProviderConfig;

const ANTHROPIC_VERSION: &str = "anthropic-version";

pub type TextStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
	pub role: String,
	pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolSpec {
	pub name: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	pub input_schema: Value,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
	model: &'a str,
	max_tokens: u32,
	temperature: f32,
	system: &'a str,
	messages: &'a [ChatTurn],
	#[serde(skip_serializing_if = "Option::is_none")]
	tools: Option<&'a [ToolSpec]>,
	stream: bool,
}

/// Starts a streaming completion. Errors returned here happen before any text is produced;
/// later failures surface as `Err` items of the stream.
pub async fn stream_reply(
	cfg: &LlmProviderConfig,
	system: &str,
	messages: &[ChatTurn],
	tools: &[ToolSpec],
) -> Result<TextStream> {
	let api_key = crate::require_key(cfg.api_key.as_deref(), "llm")?;
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let mut headers = crate::auth_headers(AuthScheme::XApiKey, api_key, &cfg.default_headers)?;

	headers.insert(
		HeaderName::from_static(ANTHROPIC_VERSION),
		HeaderValue::from_str(&cfg.anthropic_version)?,
	);

	let body = MessagesRequest {
		model: &cfg.model,
		max_tokens: cfg.max_tokens,
		temperature: cfg.temperature,
		system,
		messages,
		tools: (!tools.is_empty()).then_some(tools),
		stream: true,
	};
	let res = client.post(url).headers(headers).json(&body).send().await?;
	let res = res.error_for_status()?;

	Ok(decode_text_stream(res.bytes_stream()))
}

/// Turns a raw SSE byte stream into text deltas.
pub fn decode_text_stream<S, B, E>(body: S) -> TextStream
where
	S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
	B: AsRef<[u8]> + Send + 'static,
	E: Into<Error> + Send + 'static,
{
	let state = DecodeState {
		body: Box::pin(body),
		decoder: SseDecoder::default(),
		pending: VecDeque::new(),
		finished: false,
	};

	Box::pin(stream::unfold(state, |mut state| async move {
		loop {
			if let Some(item) = state.pending.pop_front() {
				return Some((item, state));
			}
			if state.finished {
				return None;
			}

			match state.body.next().await {
				Some(Ok(chunk)) => state.pending.extend(state.decoder.push(chunk.as_ref())),
				Some(Err(err)) => {
					state.finished = true;

					return Some((Err(err.into()), state));
				},
				None => {
					state.finished = true;

					state.pending.extend(state.decoder.finish());
				},
			}
		}
	}))
}

struct DecodeState<S> {
	body: Pin<Box<S>>,
	decoder: SseDecoder,
	pending: VecDeque<Result<String>>,
	finished: bool,
}

/// Incremental SSE framing. Events are separated by a blank line; only `data:` lines matter.
#[derive(Default)]
struct SseDecoder {
	buffer: Vec<u8>,
}
impl SseDecoder {
	fn push(&mut self, chunk: &[u8]) -> Vec<Result<String>> {
		self.buffer.extend(chunk.iter().copied().filter(|byte| *byte != b'\r'));

		let mut out = Vec::new();

		while let Some(pos) = self.buffer.windows(2).position(|window| window == b"\n\n") {
			let event: Vec<u8> = self.buffer.drain(..pos + 2).collect();

			if let Some(item) = decode_event(&event) {
				out.push(item);
			}
		}

		out
	}

	fn finish(&mut self) -> Vec<Result<String>> {
		let event = std::mem::take(&mut self.buffer);

		decode_event(&event).into_iter().collect()
	}
}

fn decode_event(event: &[u8]) -> Option<Result<String>> {
	let text = String::from_utf8_lossy(event);
	let data = text
		.lines()
		.filter_map(|line| line.strip_prefix("data:"))
		.map(str::trim_start)
		.collect::<Vec<_>>()
		.join("\n");

	if data.is_empty() || data == "[DONE]" {
		return None;
	}

	match serde_json::from_str::<Value>(&data) {
		Ok(json) => parse_event(&json).transpose(),
		Err(err) => Some(Err(err.into())),
	}
}

fn parse_event(json: &Value) -> Result<Option<String>> {
	match json.get("type").and_then(Value::as_str) {
		Some("content_block_delta") => {
			let delta = json.get("delta");
			let is_text = delta.and_then(|d| d.get("type")).and_then(Value::as_str)
				== Some("text_delta");

			if !is_text {
				return Ok(None);
			}

			Ok(delta.and_then(|d| d.get("text")).and_then(Value::as_str).map(str::to_string))
		},
		Some("error") => {
			let detail = json
				.get("error")
				.and_then(|err| err.get("message"))
				.and_then(Value::as_str)
				.unwrap_or("unknown error");

			tracing::warn!(error = %detail, "LLM stream reported an error.");

			Err(Error::Upstream { message: detail.to_string() })
		},
		_ => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const DELTA_HELLO: &str = "event: content_block_delta\ndata: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Привет\"}}\n\n";

	#[test]
	fn decoder_waits_for_event_boundary() {
		let mut decoder = SseDecoder::default();
		let (head, tail) = DELTA_HELLO.split_at(40);

		assert!(decoder.push(head.as_bytes()).is_empty());

		let items = decoder.push(tail.as_bytes());

		assert_eq!(items.len(), 1);
		assert_eq!(items[0].as_deref().ok(), Some("Привет"));
	}

	#[test]
	fn non_text_events_are_skipped() {
		let mut decoder = SseDecoder::default();
		let payload = "event: message_start\ndata: {\"type\":\"message_start\"}\n\n\
		               event: ping\ndata: {\"type\":\"ping\"}\n\n\
		               data: {\"type\":\"content_block_delta\",\"delta\":{\"type\":\"input_json_delta\",\"partial_json\":\"{}\"}}\n\n";

		assert!(decoder.push(payload.as_bytes()).is_empty());
	}

	#[test]
	fn error_event_becomes_upstream_error() {
		let json = serde_json::json!({
			"type": "error",
			"error": { "type": "overloaded_error", "message": "Overloaded" }
		});
		let err = parse_event(&json).expect_err("Expected upstream error.");

		assert!(matches!(err, Error::Upstream { ref message } if message == "Overloaded"));
	}

	#[test]
	fn crlf_framing_is_accepted() {
		let mut decoder = SseDecoder::default();
		let payload = DELTA_HELLO.replace('\n', "\r\n");
		let items = decoder.push(payload.as_bytes());

		assert_eq!(items.len(), 1);
	}
}
