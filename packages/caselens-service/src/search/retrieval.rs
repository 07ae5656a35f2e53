use std::cmp::Ordering;

use caselens_domain::{CaseRecord, text};

/// A case that survived the embedding scan, with the summary shown to callers.
#[derive(Debug, Clone)]
pub struct RetrievedCase {
	pub case: CaseRecord,
	pub summary: String,
	pub embed_score: f32,
}

/// Scores every case against the query vector and keeps the `limit` most similar. Equal scores
/// keep scan order. Summaries are only built for the cases that are kept.
pub fn retrieve(
	query_vec: &[f32],
	corpus: Vec<CaseRecord>,
	limit: usize,
	summary_chars: usize,
) -> Vec<RetrievedCase> {
	let mut scored: Vec<(CaseRecord, f32)> = corpus
		.into_iter()
		.map(|case| {
			let embed_score = cosine_similarity(query_vec, &case.embedding);

			(case, embed_score)
		})
		.collect();

	scored.sort_by(|left, right| cmp_f32_desc(left.1, right.1));
	scored.truncate(limit);

	scored
		.into_iter()
		.map(|(case, embed_score)| {
			let summary =
				text::summary_or_preview(case.summary.as_deref(), &case.text, summary_chars);

			RetrievedCase { case, summary, embed_score }
		})
		.collect()
}

/// Cosine similarity clamped to [-1, 1]. Empty, mismatched, or zero-norm inputs score 0.0.
pub fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> f32 {
	if lhs.is_empty() || lhs.len() != rhs.len() {
		return 0.0;
	}

	let mut dot = 0.0_f32;
	let mut lhs_norm = 0.0_f32;
	let mut rhs_norm = 0.0_f32;

	for (l, r) in lhs.iter().zip(rhs.iter()) {
		dot += l * r;
		lhs_norm += l * l;
		rhs_norm += r * r;
	}

	if lhs_norm <= f32::EPSILON || rhs_norm <= f32::EPSILON {
		return 0.0;
	}

	(dot / (lhs_norm.sqrt() * rhs_norm.sqrt())).clamp(-1.0, 1.0)
}

/// Descending order with NaN last.
pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}
