use caselens_domain::{CaseRecord, Decision, dataset, text};

fn case(decision_reason: Option<&str>) -> CaseRecord {
	CaseRecord {
		case_id: "case-1".to_string(),
		text: "Appeal against conviction under the arms act.".to_string(),
		summary: None,
		decision: Decision::Rejected,
		decision_reason: decision_reason.map(str::to_string),
		embedding: vec![0.1, 0.2, 0.3],
	}
}

#[test]
fn reasoning_presence_only_requires_a_non_empty_string() {
	assert!(case(Some("Evidence was insufficient.")).has_reasoning());
	assert!(case(Some("   ")).has_reasoning());
	assert!(!case(Some("")).has_reasoning());
	assert!(!case(None).has_reasoning());
}

#[test]
fn dataset_row_maps_to_case_fields() {
	let experts =
		vec![Some("Conviction upheld.".to_string()), None, Some("Sentence reduced.".to_string())];
	let decision = dataset::decision_from_label(Some(1));
	let reason = dataset::extract_decision_reason(&experts, 2);

	assert!(decision.is_accepted());
	assert_eq!(reason.as_deref(), Some("Conviction upheld. | Sentence reduced."));
}

#[test]
fn query_terms_match_case_text() {
	let record = case(None);
	let terms = text::query_terms("conviction under arms act");

	assert_eq!(
		text::match_terms_in_text(&terms, &record.text),
		vec!["conviction".to_string(), "under".to_string(), "arms".to_string()]
	);
}
