use time::OffsetDateTime;

use caselens_domain::Decision;

/// Raw corpus row. Every column is optional because legacy ingests left gaps; validation happens
/// when rows are turned into `CaseRecord`s.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CaseRow {
	pub case_id: String,
	pub embedding: Option<Vec<f32>>,
	pub text: Option<String>,
	pub summary: Option<String>,
	pub decision: Option<String>,
	pub decision_reason: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CaseDetailRow {
	pub case_id: String,
	pub text: Option<String>,
	pub summary: Option<String>,
	pub decision: Option<String>,
	pub decision_reason: Option<String>,
	pub case_source: Option<String>,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewCase {
	pub case_id: String,
	pub embedding: Vec<f32>,
	pub text: String,
	pub summary: Option<String>,
	pub decision: Decision,
	pub decision_reason: Option<String>,
	pub case_source: Option<String>,
}
