pub mod cases;
pub mod search;
pub mod time_serde;

mod error;

pub use cases::{CaseDetail, DEFAULT_RANDOM_LIMIT};
pub use error::{Error, Result};
pub use search::{
	POLICY_ID, RankingTerm, ScoreBreakdown, SearchItem, SearchRequest, SearchResponse, SearchStage,
};

use std::{future::Future, pin::Pin, sync::Arc};

use caselens_config::{Config, EmbeddingProviderConfig, ProviderConfig};
use caselens_domain::CaseRecord;
use caselens_providers::{embedding, rerank};
use caselens_storage::{db::Db, models::CaseDetailRow, queries};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait RerankProvider
where
	Self: Send + Sync,
{
	/// Returns one raw logit per document, in document order.
	fn rerank<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>>;
}

/// Read-only access to the stored cases.
pub trait CorpusReader
where
	Self: Send + Sync,
{
	/// Every usable case in a stable scan order, without duplicates.
	fn fetch_all_cases(&self) -> BoxFuture<'_, caselens_storage::Result<Vec<CaseRecord>>>;

	fn fetch_case<'a>(
		&'a self,
		case_id: &'a str,
	) -> BoxFuture<'a, caselens_storage::Result<Option<CaseDetailRow>>>;

	fn random_cases(
		&self,
		limit: i64,
	) -> BoxFuture<'_, caselens_storage::Result<Vec<CaseDetailRow>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub rerank: Arc<dyn RerankProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, rerank: Arc<dyn RerankProvider>) -> Self {
		Self { embedding, rerank }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), rerank: provider }
	}
}

/// Postgres-backed corpus. Rows that cannot be searched are filtered out on every read.
pub struct PgCorpus {
	db: Db,
	dimensions: usize,
}
impl PgCorpus {
	pub fn new(db: Db, dimensions: usize) -> Self {
		Self { db, dimensions }
	}
}
impl CorpusReader for PgCorpus {
	fn fetch_all_cases(&self) -> BoxFuture<'_, caselens_storage::Result<Vec<CaseRecord>>> {
		Box::pin(queries::fetch_corpus(&self.db, self.dimensions))
	}

	fn fetch_case<'a>(
		&'a self,
		case_id: &'a str,
	) -> BoxFuture<'a, caselens_storage::Result<Option<CaseDetailRow>>> {
		Box::pin(queries::fetch_case(&self.db, case_id))
	}

	fn random_cases(
		&self,
		limit: i64,
	) -> BoxFuture<'_, caselens_storage::Result<Vec<CaseDetailRow>>> {
		Box::pin(queries::random_cases(&self.db, limit))
	}
}

/// Stateless search service. One value serves any number of concurrent queries.
pub struct CaseSearchService {
	pub cfg: Config,
	pub corpus: Arc<dyn CorpusReader>,
	pub providers: Providers,
}
impl CaseSearchService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let dimensions = cfg.providers.embedding.dimensions as usize;
		let corpus = Arc::new(PgCorpus::new(db, dimensions));

		Self { cfg, corpus, providers: Providers::default() }
	}

	pub fn with_parts(cfg: Config, corpus: Arc<dyn CorpusReader>, providers: Providers) -> Self {
		Self { cfg, corpus, providers }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}
impl RerankProvider for DefaultProviders {
	fn rerank<'a>(
		&'a self,
		cfg: &'a ProviderConfig,
		query: &'a str,
		docs: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<f32>>> {
		Box::pin(rerank::rerank(cfg, query, docs))
	}
}
