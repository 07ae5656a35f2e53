use std::sync::Arc;

use caselens_service::CaseSearchService;
use caselens_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<CaseSearchService>,
}
impl AppState {
	/// Connects to Postgres, bootstraps the schema, and wires the HTTP providers.
	pub async fn new(config: caselens_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = CaseSearchService::new(config, db);

		Ok(Self::from_service(service))
	}

	pub fn from_service(service: CaseSearchService) -> Self {
		Self { service: Arc::new(service) }
	}
}
