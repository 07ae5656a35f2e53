pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to read dataset: {0}")]
	Io(#[from] std::io::Error),
	#[error("Embedding failed: {0}")]
	Embedding(String),
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error(transparent)]
	Storage(#[from] caselens_storage::Error),
}
