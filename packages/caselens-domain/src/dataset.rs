//! Mapping from the raw judgment-prediction dataset into stored case fields.

use crate::case::Decision;

pub const EXPERT_FIELD_COUNT: usize = 5;
pub const REASON_SEPARATOR: &str = " | ";

/// Label `1` is an accepted appeal; every other label is treated as rejected.
pub fn decision_from_label(label: Option<i64>) -> Decision {
	if label == Some(1) { Decision::Accepted } else { Decision::Rejected }
}

/// Joins the first `max_reasons` non-blank expert opinions, in expert order.
pub fn extract_decision_reason(experts: &[Option<String>], max_reasons: usize) -> Option<String> {
	let reasons: Vec<&str> = experts
		.iter()
		.take(EXPERT_FIELD_COUNT)
		.filter_map(|expert| expert.as_deref().map(str::trim))
		.filter(|reason| !reason.is_empty())
		.take(max_reasons)
		.collect();

	if reasons.is_empty() { None } else { Some(reasons.join(REASON_SEPARATOR)) }
}
