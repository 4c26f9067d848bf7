use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::download::ImageSource;
use crate::provider::GenerationProvider;
use crate::storage::AssetStore;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub provider: Arc<dyn GenerationProvider>,
    pub assets: Arc<dyn AssetStore>,
    pub source: Arc<dyn ImageSource>,
    pub config: AppConfig,
}
