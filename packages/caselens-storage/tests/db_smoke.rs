use tokio::runtime::Runtime;

use caselens_config::Postgres;
use caselens_domain::Decision;
use caselens_storage::{Error, db::Db, models::NewCase, queries};
use caselens_testkit::TestDatabase;

fn new_case(case_id: &str, embedding: Vec<f32>) -> NewCase {
	NewCase {
		case_id: case_id.to_string(),
		embedding,
		text: format!("Full judgment text for {case_id}."),
		summary: Some(format!("Summary of {case_id}.")),
		decision: Decision::Accepted,
		decision_reason: Some("Delay in filing was explained.".to_string()),
		case_source: Some("smoke".to_string()),
	}
}

async fn connect(test_db: &TestDatabase) -> Db {
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	db
}

#[test]
#[ignore = "Requires external Postgres. Set CASELENS_PG_DSN to run."]
fn cases_table_exists_after_bootstrap() {
	let Some(dsn) = caselens_testkit::env_dsn() else {
		eprintln!(
			"Skipping cases_table_exists_after_bootstrap; set CASELENS_PG_DSN to run this test."
		);

		return;
	};
	let rt = Runtime::new().expect("Failed to build runtime.");

	rt.block_on(async {
		let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
		let db = connect(&test_db).await;

		// Bootstrapping twice must be a no-op.
		db.ensure_schema().await.expect("Failed to re-run schema.");

		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = 'cases'",
		)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1);

		db.pool.close().await;
		test_db.cleanup().await.expect("Failed to clean up test database.");
	});
}

#[test]
#[ignore = "Requires external Postgres. Set CASELENS_PG_DSN to run."]
fn insert_is_idempotent_and_corpus_skips_bad_rows() {
	let Some(dsn) = caselens_testkit::env_dsn() else {
		eprintln!(
			"Skipping insert_is_idempotent_and_corpus_skips_bad_rows; set CASELENS_PG_DSN to run this test."
		);

		return;
	};
	let rt = Runtime::new().expect("Failed to build runtime.");

	rt.block_on(async {
		let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
		let db = connect(&test_db).await;

		assert!(
			queries::insert_case(&db.pool, &new_case("b-2", vec![0.0, 1.0]))
				.await
				.expect("Failed to insert case.")
		);
		assert!(
			queries::insert_case(&db.pool, &new_case("a-1", vec![1.0, 0.0]))
				.await
				.expect("Failed to insert case.")
		);
		assert!(
			!queries::insert_case(&db.pool, &new_case("a-1", vec![0.5, 0.5]))
				.await
				.expect("Failed to insert duplicate case.")
		);
		assert!(
			queries::insert_case(&db.pool, &new_case("c-3", vec![1.0, 0.0, 0.0]))
				.await
				.expect("Failed to insert case.")
		);

		sqlx::query("INSERT INTO cases (case_id, text) VALUES ('d-4', 'no vector')")
			.execute(&db.pool)
			.await
			.expect("Failed to insert raw row.");

		let corpus = queries::fetch_corpus(&db, 2).await.expect("Failed to fetch corpus.");
		let ids: Vec<&str> = corpus.iter().map(|case| case.case_id.as_str()).collect();

		assert_eq!(ids, vec!["a-1", "b-2"]);
		assert_eq!(corpus[0].embedding, vec![1.0, 0.0]);
		assert_eq!(corpus[0].decision, Decision::Accepted);

		db.pool.close().await;
		test_db.cleanup().await.expect("Failed to clean up test database.");
	});
}

#[test]
#[ignore = "Requires external Postgres. Set CASELENS_PG_DSN to run."]
fn fetch_case_and_random_cases() {
	let Some(dsn) = caselens_testkit::env_dsn() else {
		eprintln!("Skipping fetch_case_and_random_cases; set CASELENS_PG_DSN to run this test.");

		return;
	};
	let rt = Runtime::new().expect("Failed to build runtime.");

	rt.block_on(async {
		let test_db = TestDatabase::new(&dsn).await.expect("Failed to create test database.");
		let db = connect(&test_db).await;

		for idx in 0..3 {
			queries::insert_case(&db.pool, &new_case(&format!("case-{idx}"), vec![1.0, 0.0]))
				.await
				.expect("Failed to insert case.");
		}

		let found = queries::fetch_case(&db, "case-1").await.expect("Failed to fetch case.");
		let found = found.expect("Expected case-1 to exist.");

		assert_eq!(found.case_id, "case-1");
		assert_eq!(found.decision.as_deref(), Some("accepted"));
		assert_eq!(found.case_source.as_deref(), Some("smoke"));
		assert!(queries::fetch_case(&db, "missing").await.expect("Failed to fetch case.").is_none());

		let sample = queries::random_cases(&db, 2).await.expect("Failed to sample cases.");

		assert_eq!(sample.len(), 2);

		let sample = queries::random_cases(&db, 50).await.expect("Failed to sample cases.");

		assert_eq!(sample.len(), 3);

		let err = queries::random_cases(&db, 0).await.expect_err("Expected invalid limit.");

		assert!(matches!(err, Error::InvalidArgument(_)));

		db.pool.close().await;
		test_db.cleanup().await.expect("Failed to clean up test database.");
	});
}
