use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use caselens_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml_with_search(entries: &[(&str, i64)]) -> String {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");
	let search = root
		.get_mut("search")
		.and_then(Value::as_table_mut)
		.expect("Template config must include [search].");

	for (key, entry) in entries {
		search.insert(key.to_string(), Value::Integer(*entry));
	}

	toml::to_string(&value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("caselens_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads() {
	let path = write_temp_config(SAMPLE_CONFIG_TEMPLATE_TOML.to_string());
	let result = caselens_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let cfg = result.expect("Sample config must be valid.");

	assert_eq!(cfg.search.candidate_k, 10);
	assert_eq!(cfg.search.rerank_k, 10);
	assert_eq!(cfg.search.top_k, 5);
	assert_eq!(cfg.providers.embedding.dimensions, 384);
	assert!(cfg.providers.embedding.api_key.is_empty());
}

#[test]
fn search_section_defaults_apply() {
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");

	root.insert("search".to_string(), Value::Table(Default::default()));
	root.remove("ingest");

	let payload = toml::to_string(&value).expect("Failed to render template config.");
	let cfg: Config = toml::from_str(&payload).expect("Failed to parse config.");

	assert_eq!(cfg.search.candidate_k, 10);
	assert_eq!(cfg.search.rerank_k, 10);
	assert_eq!(cfg.search.top_k, 5);
	assert_eq!(cfg.search.timeout_ms, 30_000);
	assert_eq!(cfg.search.summary_chars, 300);
	assert_eq!(cfg.ingest.batch_size, 32);
	assert_eq!(cfg.ingest.commit_every, 500);
	assert!(caselens_config::validate(&cfg).is_ok());
}

#[test]
fn top_k_must_not_exceed_rerank_k() {
	let payload = sample_toml_with_search(&[("top_k", 12)]);
	let path = write_temp_config(payload);
	let result = caselens_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected top_k validation error.");

	assert!(
		err.to_string().contains("search.top_k must not exceed search.rerank_k."),
		"Unexpected error: {err}"
	);
}

#[test]
fn rerank_k_must_not_exceed_candidate_k() {
	let mut cfg = base_config();

	cfg.search.candidate_k = 5;
	cfg.search.top_k = 5;

	let err = caselens_config::validate(&cfg).expect_err("Expected rerank_k validation error.");

	assert!(
		err.to_string().contains("search.rerank_k must not exceed search.candidate_k."),
		"Unexpected error: {err}"
	);
}

#[test]
fn zero_cutoffs_are_rejected() {
	for (key, expected) in [
		("candidate_k", "search.candidate_k must be greater than zero."),
		("rerank_k", "search.rerank_k must be greater than zero."),
		("top_k", "search.top_k must be greater than zero."),
		("timeout_ms", "search.timeout_ms must be greater than zero."),
		("summary_chars", "search.summary_chars must be greater than zero."),
	] {
		let payload = sample_toml_with_search(&[(key, 0)]);
		let cfg: Config = toml::from_str(&payload).expect("Failed to parse config.");
		let err = caselens_config::validate(&cfg).expect_err("Expected validation error.");

		assert!(err.to_string().contains(expected), "Unexpected error for {key}: {err}");
	}
}

#[test]
fn embedding_dimensions_must_be_positive() {
	let mut cfg = base_config();

	cfg.providers.embedding.dimensions = 0;

	let err = caselens_config::validate(&cfg).expect_err("Expected dimensions validation error.");

	assert!(err.to_string().contains("providers.embedding.dimensions must be greater than zero."));
}

#[test]
fn ingest_batch_sizes_must_be_positive() {
	let mut cfg = base_config();

	cfg.ingest.commit_every = 0;

	let err = caselens_config::validate(&cfg).expect_err("Expected ingest validation error.");

	assert!(err.to_string().contains("ingest.commit_every must be greater than zero."));
}

#[test]
fn missing_file_reports_read_error() {
	let mut path = env::temp_dir();

	path.push("caselens_config_test_missing_file.toml");

	let err = caselens_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let path = write_temp_config("[service\nhttp_bind = ".to_string());
	let result = caselens_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err}");
}
