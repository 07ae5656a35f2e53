use caselens_config::ProviderConfig;

use crate::{
	Error, RerankProvider, Result,
	search::retrieval::{RetrievedCase, cmp_f32_desc},
};

#[derive(Debug, Clone)]
pub struct RerankedCase {
	pub retrieved: RetrievedCase,
	/// Raw cross-encoder logit.
	pub cross_score: f32,
}

/// Scores all candidates in one provider call, then keeps the `limit` highest logits. Equal
/// logits keep retrieval order. No call is made for an empty batch.
pub async fn rerank(
	provider: &dyn RerankProvider,
	cfg: &ProviderConfig,
	query: &str,
	candidates: Vec<RetrievedCase>,
	limit: usize,
) -> Result<Vec<RerankedCase>> {
	if candidates.is_empty() {
		return Ok(Vec::new());
	}

	let docs: Vec<String> =
		candidates.iter().map(|candidate| candidate.case.text.clone()).collect();
	let scores = provider
		.rerank(cfg, query, &docs)
		.await
		.map_err(|err| Error::Rerank { message: err.to_string() })?;

	if scores.len() != candidates.len() {
		return Err(Error::Rerank {
			message: format!(
				"Reranker returned {} scores for {} documents.",
				scores.len(),
				candidates.len()
			),
		});
	}

	let mut reranked: Vec<RerankedCase> = candidates
		.into_iter()
		.zip(scores)
		.map(|(retrieved, cross_score)| RerankedCase { retrieved, cross_score })
		.collect();

	reranked.sort_by(|left, right| cmp_f32_desc(left.cross_score, right.cross_score));
	reranked.truncate(limit);

	Ok(reranked)
}
