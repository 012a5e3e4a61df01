use crate::services::media_host::MediaHost;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

pub mod engagement;
pub mod publish;
pub mod query;
pub mod types;

pub use types::*;

/// Video persistence and engagement. Handlers stay thin and call into this.
pub struct VideoService {
    db: DatabaseConnection,
    media: Arc<dyn MediaHost>,
}

impl VideoService {
    pub fn new(db: DatabaseConnection, media: Arc<dyn MediaHost>) -> Self {
        Self { db, media }
    }
}
