use std::collections::HashSet;

use sqlx::{Executor, Postgres};

use crate::{
	Error, Result,
	db::Db,
	models::{CaseDetailRow, CaseRow, NewCase},
};
use caselens_domain::{CaseRecord, Decision};

pub const MAX_RANDOM_CASES: i64 = 100;

/// Reads the whole corpus in `case_id` order, dropping rows the search pipeline cannot use.
pub async fn fetch_corpus(db: &Db, dimensions: usize) -> Result<Vec<CaseRecord>> {
	let rows: Vec<CaseRow> = sqlx::query_as(
		"\
SELECT
	case_id,
	embedding,
	text,
	summary,
	decision,
	decision_reason
FROM cases
ORDER BY case_id",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(corpus_from_rows(rows, dimensions))
}

/// Keeps scan order. A row without text, without an embedding, with an embedding of the wrong
/// length, or repeating an earlier id is skipped with a warning.
pub fn corpus_from_rows(rows: Vec<CaseRow>, dimensions: usize) -> Vec<CaseRecord> {
	let mut out = Vec::with_capacity(rows.len());
	let mut seen = HashSet::new();

	for row in rows {
		let CaseRow { case_id, embedding, text, summary, decision, decision_reason } = row;

		if !seen.insert(case_id.clone()) {
			tracing::warn!(case_id = %case_id, "Duplicate case row skipped.");

			continue;
		}

		let Some(text) = text else {
			tracing::warn!(case_id = %case_id, "Case row missing text.");

			continue;
		};
		let Some(embedding) = embedding else {
			tracing::warn!(case_id = %case_id, "Case row missing embedding.");

			continue;
		};

		if embedding.len() != dimensions {
			tracing::warn!(
				case_id = %case_id,
				expected = dimensions,
				actual = embedding.len(),
				"Case embedding dimension mismatch."
			);

			continue;
		}

		out.push(CaseRecord {
			case_id,
			text,
			summary,
			decision: Decision::parse(decision.as_deref()),
			decision_reason,
			embedding,
		});
	}

	out
}

pub async fn fetch_case(db: &Db, case_id: &str) -> Result<Option<CaseDetailRow>> {
	let row = sqlx::query_as(
		"\
SELECT
	case_id,
	text,
	summary,
	decision,
	decision_reason,
	case_source,
	created_at
FROM cases
WHERE case_id = $1",
	)
	.bind(case_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn random_cases(db: &Db, limit: i64) -> Result<Vec<CaseDetailRow>> {
	if !(1..=MAX_RANDOM_CASES).contains(&limit) {
		return Err(Error::InvalidArgument(format!(
			"limit must be between 1 and {MAX_RANDOM_CASES}."
		)));
	}

	let rows = sqlx::query_as(
		"\
SELECT
	case_id,
	text,
	summary,
	decision,
	decision_reason,
	case_source,
	created_at
FROM cases
ORDER BY random()
LIMIT $1",
	)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Inserts a case unless its id already exists. Returns whether a row was written.
pub async fn insert_case<'e, E>(executor: E, case: &NewCase) -> Result<bool>
where
	E: Executor<'e, Database = Postgres>,
{
	let result = sqlx::query(
		"\
INSERT INTO cases (
	case_id,
	embedding,
	text,
	summary,
	decision,
	decision_reason,
	case_source
)
VALUES ($1, $2, $3, $4, $5, $6, $7)
ON CONFLICT (case_id) DO NOTHING",
	)
	.bind(case.case_id.as_str())
	.bind(case.embedding.as_slice())
	.bind(case.text.as_str())
	.bind(case.summary.as_deref())
	.bind(case.decision.as_str())
	.bind(case.decision_reason.as_deref())
	.bind(case.case_source.as_deref())
	.execute(executor)
	.await?;

	Ok(result.rows_affected() == 1)
}
