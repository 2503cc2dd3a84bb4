use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::{Error, LumenService, Mode, Result};
use lumen_domain::{intent, stub};
use lumen_providers::llm::{ChatTurn, TextStream, ToolSpec};

pub const DEFAULT_SYSTEM_PROMPT: &str = "Ты - полезный ассистент, отвечающий на русском языке.\n\
	Если информация может быть устаревшей или тебе нужны актуальные данные для ответа - явно об \
	этом сообщи.\nОтвечай точно, информативно и полезно.";

const SEARCH_RESULTS_HEADING: &str = "# Результаты поиска по запросу пользователя:";
const FORWARDED_ROLES: [&str; 2] = ["user", "assistant"];

#[derive(Clone, Debug, Deserialize)]
pub struct ChatMessage {
	pub role: String,
	pub content: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ToolDefinition {
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub parameters: Value,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatRequest {
	pub messages: Vec<ChatMessage>,
	#[serde(default)]
	pub system: Option<String>,
	#[serde(default)]
	pub tools: Option<BTreeMap<String, ToolDefinition>>,
}
impl ChatRequest {
	/// Content of the most recent `user` message.
	pub fn last_user_message(&self) -> Option<&str> {
		self.messages
			.iter()
			.rev()
			.find(|message| message.role == "user")
			.map(|message| message.content.as_str())
	}
}

pub enum ChatReply {
	/// Complete canned answer; no provider was contacted.
	Stub { content: String },
	/// Text deltas from the LLM, in arrival order. `search_performed` is true when search results
	/// were added to the system prompt.
	Stream { stream: TextStream, search_performed: bool },
}

impl LumenService {
	pub async fn chat(&self, req: ChatRequest, mode: Mode) -> Result<ChatReply> {
		let last_user = req.last_user_message().filter(|text| !text.trim().is_empty());

		if mode == Mode::Test {
			return Ok(ChatReply::Stub { content: stub::chat_stub(last_user) });
		}

		let turns: Vec<ChatTurn> = req
			.messages
			.iter()
			.filter(|message| FORWARDED_ROLES.contains(&message.role.as_str()))
			.map(|message| ChatTurn { role: message.role.clone(), content: message.content.clone() })
			.collect();

		if turns.is_empty() {
			return Err(Error::InvalidRequest {
				message: "messages must include at least one user or assistant message.".to_string(),
			});
		}

		let base_system = req
			.system
			.as_deref()
			.filter(|system| !system.trim().is_empty())
			.unwrap_or(DEFAULT_SYSTEM_PROMPT);
		let search_query = last_user.filter(|query| match intent::search_trigger(query) {
			Some(trigger) => {
				tracing::info!(trigger = trigger.as_str(), "Message needs a web search.");

				true
			},
			None => {
				tracing::info!("Message does not need a web search.");

				false
			},
		});
		let search_results = match search_query {
			Some(query) => match self.search(query, mode).await {
				Ok(results) => results,
				Err(err) => {
					tracing::warn!(error = %err, "Search failed. Continuing chat without results.");

					String::new()
				},
			},
			None => String::new(),
		};
		let search_performed = !search_results.is_empty();
		let system = with_search_results(base_system, &search_results);
		let tools = req.tools.map(tool_specs).unwrap_or_default();
		let stream = self
			.providers
			.chat
			.stream_reply(&self.cfg.providers.llm, &system, &turns, &tools)
			.await?;

		tracing::info!(
			turns = turns.len(),
			tools = tools.len(),
			search_performed,
			"LLM stream started."
		);

		Ok(ChatReply::Stream { stream, search_performed })
	}
}

fn with_search_results(system: &str, results: &str) -> String {
	if results.is_empty() {
		return system.to_string();
	}

	format!("{system}\n\n{SEARCH_RESULTS_HEADING}\n{results}")
}

fn tool_specs(tools: BTreeMap<String, ToolDefinition>) -> Vec<ToolSpec> {
	tools
		.into_iter()
		.map(|(name, tool)| {
			let input_schema = if tool.parameters.is_object() {
				tool.parameters
			} else {
				serde_json::json!({ "type": "object", "properties": {} })
			};

			ToolSpec { name, description: tool.description, input_schema }
		})
		.collect()
}
