use caselens_domain::Decision;
use caselens_storage::{models::CaseDetailRow, queries::MAX_RANDOM_CASES};

use crate::{CaseSearchService, Error, Result};

pub const DEFAULT_RANDOM_LIMIT: u32 = 10;

/// A stored case as shown to browsing clients. Embeddings are never exposed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CaseDetail {
	pub case_id: String,
	pub text: Option<String>,
	pub summary: Option<String>,
	pub decision: Decision,
	pub decision_reason: Option<String>,
	pub case_source: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: time::OffsetDateTime,
}
impl From<CaseDetailRow> for CaseDetail {
	fn from(row: CaseDetailRow) -> Self {
		Self {
			case_id: row.case_id,
			text: row.text,
			summary: row.summary,
			decision: Decision::parse(row.decision.as_deref()),
			decision_reason: row.decision_reason,
			case_source: row.case_source,
			created_at: row.created_at,
		}
	}
}

impl CaseSearchService {
	pub async fn get_case(&self, case_id: &str) -> Result<CaseDetail> {
		let case_id = case_id.trim();

		if case_id.is_empty() {
			return Err(Error::InvalidRequest { message: "case_id must be non-empty.".to_string() });
		}

		let Some(row) = self.corpus.fetch_case(case_id).await? else {
			return Err(Error::NotFound { message: format!("Case {case_id} does not exist.") });
		};

		Ok(row.into())
	}

	/// Samples stored cases. The limit defaults to [`DEFAULT_RANDOM_LIMIT`] and is capped at the
	/// storage maximum; zero is rejected.
	pub async fn random_cases(&self, limit: Option<u32>) -> Result<Vec<CaseDetail>> {
		let limit = limit.unwrap_or(DEFAULT_RANDOM_LIMIT);

		if limit == 0 {
			return Err(Error::InvalidRequest {
				message: "limit must be greater than zero.".to_string(),
			});
		}

		let limit = i64::from(limit).min(MAX_RANDOM_CASES);
		let rows = self.corpus.random_cases(limit).await?;

		Ok(rows.into_iter().map(CaseDetail::from).collect())
	}
}
