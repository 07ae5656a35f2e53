pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Embedding provider error: {message}")]
	Embedding { message: String },
	#[error("Rerank provider error: {message}")]
	Rerank { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Search exceeded its {timeout_ms} ms deadline.")]
	Timeout { timeout_ms: u64 },
}
impl From<caselens_storage::Error> for Error {
	fn from(err: caselens_storage::Error) -> Self {
		match err {
			caselens_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			caselens_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
		}
	}
}
