pub mod chat;
pub mod gate;
pub mod search;

mod error;

pub use chat::{ChatMessage, ChatReply, ChatRequest, ToolDefinition};
pub use error::{Error, Result};
pub use gate::{
	Credentials, InMemoryTestModeStore, Mode, TestModeGate, TestModeStatus, TestModeStore,
};
pub use lumen_providers::{
	Error as ProviderError,
	llm::{ChatTurn, TextStream, ToolSpec},
	search::SearchCompletion,
};
pub use search::{ResolveStrategy, SearchItem};

use std::{future::Future, pin::Pin, sync::Arc};

use lumen_config::{Config, LlmProviderConfig, SearchProviderConfig};
use lumen_providers::{llm, search as search_api};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
pub type ProviderResult<T> = lumen_providers::Result<T>;

pub trait SearchProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		system: &'a str,
		query: &'a str,
	) -> BoxFuture<'a, ProviderResult<SearchCompletion>>;
}

pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn stream_reply<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		system: &'a str,
		messages: &'a [ChatTurn],
		tools: &'a [ToolSpec],
	) -> BoxFuture<'a, ProviderResult<TextStream>>;
}

#[derive(Clone)]
pub struct Providers {
	pub search: Arc<dyn SearchProvider>,
	pub chat: Arc<dyn ChatProvider>,
}
impl Providers {
	pub fn new(search: Arc<dyn SearchProvider>, chat: Arc<dyn ChatProvider>) -> Self {
		Self { search, chat }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { search: provider.clone(), chat: provider }
	}
}

pub struct LumenService {
	pub cfg: Config,
	pub providers: Providers,
	pub gate: TestModeGate,
	pub strategy: ResolveStrategy,
}
impl LumenService {
	pub fn new(cfg: Config) -> Self {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		let gate = TestModeGate::from_config(&cfg);

		Self::with_gate(cfg, providers, gate)
	}

	pub fn with_gate(cfg: Config, providers: Providers, gate: TestModeGate) -> Self {
		let strategy = ResolveStrategy::from_config(&cfg.search);

		Self { cfg, providers, gate, strategy }
	}
}

struct DefaultProviders;
impl SearchProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a SearchProviderConfig,
		system: &'a str,
		query: &'a str,
	) -> BoxFuture<'a, ProviderResult<SearchCompletion>> {
		Box::pin(search_api::complete(cfg, system, query))
	}
}
impl ChatProvider for DefaultProviders {
	fn stream_reply<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		system: &'a str,
		messages: &'a [ChatTurn],
		tools: &'a [ToolSpec],
	) -> BoxFuture<'a, ProviderResult<TextStream>> {
		Box::pin(llm::stream_reply(cfg, system, messages, tools))
	}
}
