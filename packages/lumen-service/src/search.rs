use std::time::Instant;

use futures::{StreamExt, stream};
use time::OffsetDateTime;

use crate::{Error, LumenService, Mode, Result};
use lumen_domain::{classify, enhance, split, stub};

pub const SEARCH_SYSTEM_PROMPT: &str = "Ты - поисковый ассистент, который предоставляет ТОЛЬКО \
	фактическую информацию из интернета. НЕ ГЕНЕРИРУЙ И НЕ ПРИДУМЫВАЙ ДАННЫЕ. Если ты не можешь \
	найти точную информацию, четко укажи это. Всегда указывай ИСТОЧНИКИ предоставляемой \
	информации в виде ссылок. Когда речь идет о компаниях, акциях, рейтингах - приводи ТОЛЬКО \
	СВЕЖИЕ данные с актуальной датой. Для вопросов о погоде обязательно указывай прогноз с датой.";
pub const SEARCH_ERROR_PLACEHOLDER: &str = "Произошла ошибка при поиске информации.";
pub const NOT_FOUND_PLACEHOLDER: &str = "Информация по запросу не найдена.";

const MERGE_HEADER: &str = "\n\n=== РЕЗУЛЬТАТЫ ПОИСКА ===\n\n";

/// How sub-queries of one search are dispatched to the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveStrategy {
	Sequential,
	Parallel { max_in_flight: usize },
}
impl ResolveStrategy {
	pub fn from_config(cfg: &lumen_config::Search) -> Self {
		match cfg.concurrency.as_str() {
			"parallel" => Self::Parallel { max_in_flight: (cfg.max_parallel as usize).max(1) },
			_ => Self::Sequential,
		}
	}

	fn in_flight(self) -> usize {
		match self {
			Self::Sequential => 1,
			Self::Parallel { max_in_flight } => max_in_flight.max(1),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchItem {
	pub sub_query: String,
	pub result: String,
}

/// Joins resolved items. A single item is returned verbatim.
pub fn merge(items: &[SearchItem]) -> String {
	if let [item] = items {
		return item.result.clone();
	}

	let sections: String = items
		.iter()
		.map(|item| format!("ЗАПРОС: {}\n\n{}\n\n---\n\n", item.sub_query, item.result))
		.collect();

	format!("{MERGE_HEADER}{sections}")
}

impl LumenService {
	pub async fn search(&self, query: &str, mode: Mode) -> Result<String> {
		if query.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}

		if mode == Mode::Test {
			tracing::info!(query = %query, "Serving search stub in test mode.");

			return Ok(stub::search_stub(query, OffsetDateTime::now_utc().date()));
		}

		let sub_queries = split::split(query);

		tracing::info!(
			count = sub_queries.len(),
			strategy = ?self.strategy,
			"Resolving search sub-queries."
		);

		let items = self.resolve_sub_queries(sub_queries).await;

		Ok(merge(&items))
	}

	/// Output order always equals submission order, whatever the strategy.
	async fn resolve_sub_queries(&self, sub_queries: Vec<String>) -> Vec<SearchItem> {
		let pending: Vec<_> =
			sub_queries.into_iter().map(|sub_query| self.resolve_one(sub_query)).collect();

		stream::iter(pending).buffered(self.strategy.in_flight()).collect().await
	}

	async fn resolve_one(&self, sub_query: String) -> SearchItem {
		let tag = classify::classify(&sub_query);
		let enhanced = enhance::enhance(&sub_query, tag);
		let started = Instant::now();
		let outcome = self
			.providers
			.search
			.complete(&self.cfg.providers.search, SEARCH_SYSTEM_PROMPT, &enhanced)
			.await;
		let elapsed_ms = started.elapsed().as_millis() as u64;
		let result = match outcome {
			Ok(completion) => {
				tracing::info!(
					sub_query = %sub_query,
					tag = tag.as_str(),
					enhanced = %enhanced,
					elapsed_ms,
					response_id = completion.id.as_deref().unwrap_or("-"),
					"Search sub-query resolved."
				);

				completion.content.unwrap_or_else(|| NOT_FOUND_PLACEHOLDER.to_string())
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					sub_query = %sub_query,
					elapsed_ms,
					"Search sub-query failed."
				);

				SEARCH_ERROR_PLACEHOLDER.to_string()
			},
		};

		SearchItem { sub_query, result }
	}
}
