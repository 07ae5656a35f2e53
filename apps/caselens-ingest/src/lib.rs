pub mod ingest;

mod error;

pub use error::{Error, Result};

use std::{fs::File, io::BufReader, path::PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use caselens_service::Providers;
use caselens_storage::db::Db;

use crate::ingest::IngestOptions;

#[derive(Debug, Parser)]
#[command(
	version = caselens_cli::VERSION,
	rename_all = "kebab",
	styles = caselens_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// JSONL dataset, one case object per line.
	#[arg(long, short = 'i', value_name = "FILE")]
	pub input: PathBuf,
	/// Dataset split recorded as the case source, e.g. `train`.
	#[arg(long, value_name = "LABEL")]
	pub source: Option<String>,
	/// Stop after this many rows have been processed.
	#[arg(long, value_name = "N")]
	pub limit: Option<usize>,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = caselens_config::load(&args.config)?;
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let reader = BufReader::new(File::open(&args.input)?);
	let options = IngestOptions {
		source: args.source,
		limit: args.limit,
		batch_size: config.ingest.batch_size as usize,
		commit_every: config.ingest.commit_every as usize,
		max_reasons: config.ingest.max_reasons as usize,
	};
	let providers = Providers::default();

	tracing::info!(input = %args.input.display(), "Ingesting dataset.");

	let report = ingest::ingest_lines(
		&db,
		providers.embedding.as_ref(),
		&config.providers.embedding,
		reader,
		&options,
	)
	.await?;

	tracing::info!(
		processed = report.processed,
		inserted = report.inserted,
		skipped = report.skipped,
		"Ingestion finished."
	);

	Ok(())
}
