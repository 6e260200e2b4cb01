use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use chirpy_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    /// Deployment platform name; destructive admin operations are only
    /// allowed when this is "dev".
    pub platform: String,
    pub fileserver_hits: AtomicU64,
}

impl AppStateInner {
    pub fn new(db: Database, jwt_secret: String, platform: String) -> AppState {
        Arc::new(Self {
            db,
            jwt_secret,
            platform,
            fileserver_hits: AtomicU64::new(0),
        })
    }
}
