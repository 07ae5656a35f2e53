use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
	#[serde(default)]
	pub ingest: Ingest,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub rerank: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	/// Sent as a bearer token when non-empty. Local model servers usually leave it blank.
	#[serde(default)]
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Stage cutoffs of the search pipeline. The three limits are tuned independently.
#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	/// Candidates kept after the embedding scan.
	#[serde(default = "default_candidate_k")]
	pub candidate_k: u32,
	/// Candidates kept after cross-encoder reranking.
	#[serde(default = "default_rerank_k")]
	pub rerank_k: u32,
	/// Hard cap on results returned to callers.
	#[serde(default = "default_top_k")]
	pub top_k: u32,
	/// Deadline for one whole search, covering every provider call.
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	/// Length of the text preview used when a case has no stored summary.
	#[serde(default = "default_summary_chars")]
	pub summary_chars: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			candidate_k: default_candidate_k(),
			rerank_k: default_rerank_k(),
			top_k: default_top_k(),
			timeout_ms: default_timeout_ms(),
			summary_chars: default_summary_chars(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Ingest {
	pub batch_size: u32,
	pub commit_every: u32,
	pub max_reasons: u32,
}
impl Default for Ingest {
	fn default() -> Self {
		Self { batch_size: 32, commit_every: 500, max_reasons: 2 }
	}
}

fn default_candidate_k() -> u32 {
	10
}

fn default_rerank_k() -> u32 {
	10
}

fn default_top_k() -> u32 {
	5
}

fn default_timeout_ms() -> u64 {
	30_000
}

fn default_summary_chars() -> u32 {
	300
}
