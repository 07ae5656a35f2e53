use std::io::BufRead;

use serde::Deserialize;
use serde_json::Value;

use caselens_config::EmbeddingProviderConfig;
use caselens_domain::{Decision, dataset};
use caselens_service::EmbeddingProvider;
use caselens_storage::{db::Db, models::NewCase, queries};

use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct IngestOptions {
	pub source: Option<String>,
	pub limit: Option<usize>,
	pub batch_size: usize,
	pub commit_every: usize,
	pub max_reasons: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
	/// Rows that reached the insert step.
	pub processed: usize,
	/// Rows actually written; existing ids are left untouched.
	pub inserted: usize,
	/// Lines that were unparsable or lacked an id or text.
	pub skipped: usize,
}

/// A dataset row ready to be embedded.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCase {
	pub case_id: String,
	pub text: String,
	pub summary: Option<String>,
	pub decision: Decision,
	pub decision_reason: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum LineOutcome {
	Case(PendingCase),
	Blank,
	Skip(String),
}

#[derive(Debug, Deserialize)]
struct DatasetRow {
	id: Option<Value>,
	text: Option<String>,
	label: Option<i64>,
	summary: Option<String>,
	expert_1: Option<String>,
	expert_2: Option<String>,
	expert_3: Option<String>,
	expert_4: Option<String>,
	expert_5: Option<String>,
}

pub fn parse_line(line: &str, max_reasons: usize) -> LineOutcome {
	if line.trim().is_empty() {
		return LineOutcome::Blank;
	}

	let row: DatasetRow = match serde_json::from_str(line) {
		Ok(row) => row,
		Err(err) => return LineOutcome::Skip(format!("invalid JSON: {err}")),
	};
	let case_id = match row.id {
		Some(Value::String(id)) => id.trim().to_string(),
		Some(Value::Number(id)) => id.to_string(),
		_ => String::new(),
	};

	if case_id.is_empty() {
		return LineOutcome::Skip("missing id".to_string());
	}

	let Some(text) = row.text.filter(|text| !text.trim().is_empty()) else {
		return LineOutcome::Skip(format!("case {case_id} has no text"));
	};
	let experts = [row.expert_1, row.expert_2, row.expert_3, row.expert_4, row.expert_5];

	LineOutcome::Case(PendingCase {
		case_id,
		text,
		summary: row.summary.filter(|summary| !summary.trim().is_empty()),
		decision: dataset::decision_from_label(row.label),
		decision_reason: dataset::extract_decision_reason(&experts, max_reasons),
	})
}

/// Embeds and inserts every usable line. Work is committed every `commit_every` processed rows
/// and once more at the end.
pub async fn ingest_lines<R>(
	db: &Db,
	embedder: &dyn EmbeddingProvider,
	cfg: &EmbeddingProviderConfig,
	reader: R,
	options: &IngestOptions,
) -> Result<IngestReport>
where
	R: BufRead,
{
	let batch_size = options.batch_size.max(1);
	let commit_every = options.commit_every.max(1);
	let mut report = IngestReport::default();
	let mut batch: Vec<PendingCase> = Vec::with_capacity(batch_size);
	let mut last_commit = 0;
	let mut tx = db.pool.begin().await?;

	for (line_no, line) in reader.lines().enumerate() {
		if options.limit.is_some_and(|limit| report.processed + batch.len() >= limit) {
			break;
		}

		match parse_line(&line?, options.max_reasons) {
			LineOutcome::Case(case) => batch.push(case),
			LineOutcome::Blank => continue,
			LineOutcome::Skip(reason) => {
				tracing::warn!(line = line_no + 1, reason = %reason, "Dataset line skipped.");

				report.skipped += 1;

				continue;
			},
		}

		if batch.len() < batch_size {
			continue;
		}

		report.inserted += flush_batch(&mut tx, embedder, cfg, &batch, options).await?;
		report.processed += batch.len();

		batch.clear();

		if report.processed - last_commit >= commit_every {
			tx.commit().await?;

			tx = db.pool.begin().await?;
			last_commit = report.processed;

			tracing::info!(processed = report.processed, "Committed ingestion batch.");
		}
	}

	if !batch.is_empty() {
		report.inserted += flush_batch(&mut tx, embedder, cfg, &batch, options).await?;
		report.processed += batch.len();
	}

	tx.commit().await?;

	Ok(report)
}

async fn flush_batch(
	tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
	embedder: &dyn EmbeddingProvider,
	cfg: &EmbeddingProviderConfig,
	batch: &[PendingCase],
	options: &IngestOptions,
) -> Result<usize> {
	let texts: Vec<String> = batch.iter().map(|case| case.text.clone()).collect();
	let vectors =
		embedder.embed(cfg, &texts).await.map_err(|err| Error::Embedding(err.to_string()))?;

	if vectors.len() != batch.len() {
		return Err(Error::Embedding(format!(
			"Provider returned {} vectors for {} texts.",
			vectors.len(),
			batch.len()
		)));
	}

	let mut inserted = 0;

	for (case, embedding) in batch.iter().zip(vectors) {
		if embedding.len() != cfg.dimensions as usize {
			return Err(Error::Embedding(format!(
				"Embedding for case {} has {} dimensions, expected {}.",
				case.case_id,
				embedding.len(),
				cfg.dimensions
			)));
		}

		let new_case = NewCase {
			case_id: case.case_id.clone(),
			embedding,
			text: case.text.clone(),
			summary: case.summary.clone(),
			decision: case.decision,
			decision_reason: case.decision_reason.clone(),
			case_source: options.source.clone(),
		};

		if queries::insert_case(&mut **tx, &new_case).await? {
			inserted += 1;
		} else {
			tracing::debug!(case_id = %case.case_id, "Case already stored.");
		}
	}

	Ok(inserted)
}
