use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::search::{rerank::RerankedCase, retrieval::cmp_f32_desc};

pub const POLICY_ID: &str = "case_fusion/v1";

pub const EMBEDDING_WEIGHT: f32 = 0.5;
pub const CROSS_ENCODER_WEIGHT: f32 = 0.3;
pub const DECISION_WEIGHT: f32 = 0.15;
pub const REASONING_WEIGHT: f32 = 0.05;

pub const ACCEPTED_FACTOR: f32 = 1.0;
pub const NOT_ACCEPTED_FACTOR: f32 = 0.7;
pub const REASONING_PRESENT_FACTOR: f32 = 1.0;
pub const REASONING_MISSING_FACTOR: f32 = 0.8;

const TERM_EMBEDDING: &str = "fusion.embedding";
const TERM_CROSS_ENCODER: &str = "fusion.cross_encoder";
const TERM_DECISION: &str = "fusion.decision";
const TERM_REASONING: &str = "fusion.reasoning";

/// Weighted contribution of each signal, rounded to four decimals.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
	pub embedding: f32,
	pub cross_encoder: f32,
	pub decision: f32,
	pub reasoning: f32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RankingTerm {
	pub name: String,
	pub value: f32,
	pub inputs: BTreeMap<String, Value>,
}

#[derive(Debug, Clone)]
pub struct ScoredCase {
	pub reranked: RerankedCase,
	/// Cross-encoder logit mapped into [0, 1].
	pub cross_norm: f64,
	pub breakdown: ScoreBreakdown,
	pub final_score: f32,
	pub terms: Vec<RankingTerm>,
}

/// Fuses all signals, orders by final score (ties keep input order, NaN last), and keeps at most
/// `limit` cases.
pub fn score(candidates: Vec<RerankedCase>, limit: usize) -> Vec<ScoredCase> {
	let mut scored: Vec<ScoredCase> = candidates.into_iter().map(score_one).collect();

	scored.sort_by(|left, right| cmp_f32_desc(left.final_score, right.final_score));
	scored.truncate(limit);

	scored
}

/// Logistic function in f64, evaluated so that large magnitudes never overflow.
///
/// Strictly increasing up to x ≈ 36.7, where the result rounds to exactly 1.0. On the negative
/// side it stays positive until `exp` underflows near x ≈ -745.
pub fn sigmoid(x: f32) -> f64 {
	let x = f64::from(x);

	if x >= 0.0 {
		1.0 / (1.0 + (-x).exp())
	} else {
		let e = x.exp();

		e / (1.0 + e)
	}
}

pub fn round4(value: f32) -> f32 {
	(value * 10_000.0).round() / 10_000.0
}

fn score_one(reranked: RerankedCase) -> ScoredCase {
	let case = &reranked.retrieved.case;
	let embed_score = reranked.retrieved.embed_score;
	let embedding_factor = embed_score.clamp(0.0, 1.0);
	let cross_norm = sigmoid(reranked.cross_score);
	let decision_factor =
		if case.decision.is_accepted() { ACCEPTED_FACTOR } else { NOT_ACCEPTED_FACTOR };
	let has_reasoning = case.has_reasoning();
	let reasoning_factor =
		if has_reasoning { REASONING_PRESENT_FACTOR } else { REASONING_MISSING_FACTOR };
	let embedding = EMBEDDING_WEIGHT * embedding_factor;
	let cross_encoder = (f64::from(CROSS_ENCODER_WEIGHT) * cross_norm) as f32;
	let decision = DECISION_WEIGHT * decision_factor;
	let reasoning = REASONING_WEIGHT * reasoning_factor;
	let final_score = round4(embedding + cross_encoder + decision + reasoning);
	let breakdown = ScoreBreakdown {
		embedding: round4(embedding),
		cross_encoder: round4(cross_encoder),
		decision: round4(decision),
		reasoning: round4(reasoning),
	};
	let terms = vec![
		term(
			TERM_EMBEDDING,
			breakdown.embedding,
			EMBEDDING_WEIGHT,
			embedding_factor,
			[("embed_score", serde_json::json!(embed_score))],
		),
		term(
			TERM_CROSS_ENCODER,
			breakdown.cross_encoder,
			CROSS_ENCODER_WEIGHT,
			cross_norm as f32,
			[("cross_score", serde_json::json!(reranked.cross_score))],
		),
		term(
			TERM_DECISION,
			breakdown.decision,
			DECISION_WEIGHT,
			decision_factor,
			[("decision", serde_json::json!(case.decision.as_str()))],
		),
		term(
			TERM_REASONING,
			breakdown.reasoning,
			REASONING_WEIGHT,
			reasoning_factor,
			[("has_reasoning", serde_json::json!(has_reasoning))],
		),
	];

	ScoredCase { reranked, cross_norm, breakdown, final_score, terms }
}

fn term<const N: usize>(
	name: &str,
	value: f32,
	weight: f32,
	factor: f32,
	signals: [(&str, Value); N],
) -> RankingTerm {
	let mut inputs = BTreeMap::new();

	inputs.insert("weight".to_string(), serde_json::json!(weight));
	inputs.insert("factor".to_string(), serde_json::json!(factor));

	for (key, signal) in signals {
		inputs.insert(key.to_string(), signal);
	}

	RankingTerm { name: name.to_string(), value, inputs }
}
