use std::io::Cursor;

use serde_json::Map;

use caselens_config::{EmbeddingProviderConfig, Postgres};
use caselens_ingest::{
	Error,
	ingest::{self, IngestOptions},
};
use caselens_service::{BoxFuture, EmbeddingProvider};
use caselens_storage::{db::Db, queries};
use caselens_testkit::TestDatabase;

struct UnitEmbedding {
	dims: usize,
}
impl EmbeddingProvider for UnitEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		let mut vector = vec![0.0; self.dims];

		if let Some(first) = vector.first_mut() {
			*first = 1.0;
		}

		Box::pin(async move { Ok(vec![vector; texts.len()]) })
	}
}

fn embedding_cfg() -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: String::new(),
		path: "/".to_string(),
		model: "test".to_string(),
		dimensions: 3,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

fn options(limit: Option<usize>) -> IngestOptions {
	IngestOptions {
		source: Some("train".to_string()),
		limit,
		batch_size: 2,
		commit_every: 3,
		max_reasons: 2,
	}
}

const DATASET: &str = r#"{"id":"c1","text":"First judgment.","label":1,"expert_1":"Reasoned."}
{"id":"c2","text":"Second judgment.","label":0}

not json
{"id":"c3","text":"   ","label":1}
{"id":"c1","text":"Duplicate of the first.","label":0}
{"id":"c4","text":"Fourth judgment.","label":1,"summary":"Fourth summary."}
{"id":"c5","text":"Fifth judgment.","label":0}
"#;

async fn setup(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CASELENS_PG_DSN to run."]
async fn ingests_dataset_and_reports_counts() {
	let Some(dsn) = caselens_testkit::env_dsn() else {
		eprintln!("Skipping ingests_dataset_and_reports_counts; set CASELENS_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db).await;
	let report = ingest::ingest_lines(
		&db,
		&UnitEmbedding { dims: 3 },
		&embedding_cfg(),
		Cursor::new(DATASET),
		&options(None),
	)
	.await
	.expect("Ingestion failed.");

	assert_eq!(report.processed, 5);
	assert_eq!(report.inserted, 4);
	assert_eq!(report.skipped, 2);

	let corpus = queries::fetch_corpus(&db, 3).await.expect("Failed to fetch corpus.");
	let ids: Vec<&str> = corpus.iter().map(|case| case.case_id.as_str()).collect();

	assert_eq!(ids, vec!["c1", "c2", "c4", "c5"]);
	assert_eq!(corpus[0].text, "First judgment.");
	assert_eq!(corpus[0].decision_reason.as_deref(), Some("Reasoned."));
	assert_eq!(corpus[2].summary.as_deref(), Some("Fourth summary."));

	let detail = queries::fetch_case(&db, "c4").await.expect("Failed to fetch case.");

	assert_eq!(detail.and_then(|case| case.case_source).as_deref(), Some("train"));

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set CASELENS_PG_DSN to run."]
async fn limit_caps_processed_rows_and_bad_dimensions_abort() {
	let Some(dsn) = caselens_testkit::env_dsn() else {
		eprintln!(
			"Skipping limit_caps_processed_rows_and_bad_dimensions_abort; set CASELENS_PG_DSN to run this test."
		);

		return;
	};
	let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
	let db = setup(&test_db).await;
	let report = ingest::ingest_lines(
		&db,
		&UnitEmbedding { dims: 3 },
		&embedding_cfg(),
		Cursor::new(DATASET),
		&options(Some(2)),
	)
	.await
	.expect("Ingestion failed.");

	assert_eq!(report.processed, 2);

	let err = ingest::ingest_lines(
		&db,
		&UnitEmbedding { dims: 5 },
		&embedding_cfg(),
		Cursor::new(DATASET),
		&options(None),
	)
	.await
	.expect_err("Expected a dimension error.");

	assert!(matches!(err, Error::Embedding(_)));

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
