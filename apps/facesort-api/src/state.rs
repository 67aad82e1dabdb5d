use std::sync::Arc;

use facesort_service::FacesortService;
use facesort_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<FacesortService>,
}
impl AppState {
	pub async fn new(config: facesort_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = FacesortService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}
}
