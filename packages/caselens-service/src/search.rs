mod fusion;
mod rerank;
mod retrieval;

pub use fusion::{POLICY_ID, RankingTerm, ScoreBreakdown};

use std::time::Duration;

use caselens_domain::{Decision, text};

use crate::{CaseSearchService, Error, Result, search::fusion::ScoredCase};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub query: String,
	pub top_k: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchItem {
	pub rank: u32,
	pub case_id: String,
	pub embed_score: f32,
	/// Raw cross-encoder logit.
	pub cross_score: f32,
	pub cross_norm: f64,
	pub final_score: f32,
	pub decision: Decision,
	pub decision_reason: Option<String>,
	pub summary: String,
	pub text: String,
	pub score_breakdown: ScoreBreakdown,
	pub explain: Vec<RankingTerm>,
	pub matched_terms: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub policy_id: String,
	/// Candidates that reached score fusion.
	pub candidate_count: u32,
	pub items: Vec<SearchItem>,
}
impl SearchResponse {
	fn empty() -> Self {
		Self { policy_id: POLICY_ID.to_string(), candidate_count: 0, items: Vec::new() }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStage {
	Retrieving,
	Reranking,
	Scoring,
	Done,
}
impl SearchStage {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Retrieving => "retrieving",
			Self::Reranking => "reranking",
			Self::Scoring => "scoring",
			Self::Done => "done",
		}
	}
}

impl CaseSearchService {
	/// Runs retrieval, reranking and fusion for one query under the configured deadline.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		if req.query.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}

		let top_k = effective_top_k(req.top_k, self.cfg.search.top_k);
		let timeout_ms = self.cfg.search.timeout_ms;

		match tokio::time::timeout(
			Duration::from_millis(timeout_ms),
			self.run_pipeline(&req.query, top_k),
		)
		.await
		{
			Ok(result) => result,
			Err(_) => {
				tracing::warn!(timeout_ms, "Search deadline exceeded.");

				Err(Error::Timeout { timeout_ms })
			},
		}
	}

	async fn run_pipeline(&self, query: &str, top_k: u32) -> Result<SearchResponse> {
		let search_cfg = &self.cfg.search;

		log_stage(SearchStage::Retrieving, 0);

		let query_vec = self.embed_query(query).await?;
		let corpus = self.corpus.fetch_all_cases().await?;
		let corpus_size = corpus.len();
		let retrieved = retrieval::retrieve(
			&query_vec,
			corpus,
			search_cfg.candidate_k as usize,
			search_cfg.summary_chars as usize,
		);

		tracing::debug!(corpus_size, retrieved = retrieved.len(), "Embedding scan finished.");

		if retrieved.is_empty() {
			log_stage(SearchStage::Done, 0);

			return Ok(SearchResponse::empty());
		}

		log_stage(SearchStage::Reranking, retrieved.len());

		let reranked = rerank::rerank(
			self.providers.rerank.as_ref(),
			&self.cfg.providers.rerank,
			query,
			retrieved,
			search_cfg.rerank_k as usize,
		)
		.await?;
		let candidate_count = reranked.len() as u32;

		log_stage(SearchStage::Scoring, reranked.len());

		let scored = fusion::score(reranked, top_k as usize);
		let terms = text::query_terms(query);
		let items: Vec<SearchItem> = scored
			.into_iter()
			.enumerate()
			.map(|(idx, scored)| build_item(idx as u32 + 1, scored, &terms))
			.collect();

		log_stage(SearchStage::Done, items.len());

		Ok(SearchResponse { policy_id: POLICY_ID.to_string(), candidate_count, items })
	}

	async fn embed_query(&self, query: &str) -> Result<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;
		let input = [query.to_string()];
		let vectors = self
			.providers
			.embedding
			.embed(cfg, &input)
			.await
			.map_err(|err| Error::Embedding { message: err.to_string() })?;
		let Some(vector) = vectors.into_iter().next() else {
			return Err(Error::Embedding {
				message: "Embedding provider returned no vector for the query.".to_string(),
			});
		};

		if vector.len() != cfg.dimensions as usize {
			return Err(Error::Embedding {
				message: format!(
					"Query embedding has {} dimensions, expected {}.",
					vector.len(),
					cfg.dimensions
				),
			});
		}

		Ok(vector)
	}
}

/// Caller limit bounded to `1..=configured`.
pub fn effective_top_k(requested: Option<u32>, configured: u32) -> u32 {
	requested.unwrap_or(configured).max(1).min(configured)
}

fn log_stage(stage: SearchStage, candidates: usize) {
	tracing::info!(stage = stage.as_str(), candidates, "Search stage entered.");
}

fn build_item(rank: u32, scored: ScoredCase, terms: &[String]) -> SearchItem {
	let ScoredCase { reranked, cross_norm, breakdown, final_score, terms: explain } = scored;
	let cross_score = reranked.cross_score;
	let retrieved = reranked.retrieved;
	let case = retrieved.case;
	let haystack = format!("{}\n{}", retrieved.summary, case.text);
	let matched_terms = text::match_terms_in_text(terms, &haystack);

	SearchItem {
		rank,
		case_id: case.case_id,
		embed_score: retrieved.embed_score,
		cross_score,
		cross_norm,
		final_score,
		decision: case.decision,
		decision_reason: case.decision_reason,
		summary: retrieved.summary,
		text: case.text,
		score_breakdown: breakdown,
		explain,
		matched_terms,
	}
}
