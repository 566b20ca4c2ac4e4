//! Database Module
//!
//! Embedded SurrealDB storage: connection lifecycle, models and repositories.

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "store";
const DATABASE: &str = "store";

/// Database service owning the embedded SurrealDB handle
///
/// 进程启动时打开一次，通过 ServerState 传递；`Surreal` 内部是
/// Arc，clone 成本极低。进程退出时随句柄 drop 关闭。
#[derive(Clone, Debug)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the embedded database at the given path (RocksDB backend)
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!("Database connection established ({db_path})");

        Ok(Self { db })
    }

    /// Open an in-memory database (test only)
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self, AppError> {
        use surrealdb::engine::local::Mem;

        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        Ok(Self { db })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(serde::Serialize, serde::Deserialize, Clone)]
    struct Probe {
        value: i64,
    }

    #[tokio::test]
    async fn test_open_disk_database_and_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let service = DbService::new(&path.to_string_lossy()).await.unwrap();

        let created: Option<Probe> = service
            .db
            .create("probe")
            .content(Probe { value: 42 })
            .await
            .unwrap();
        assert_eq!(created.map(|p| p.value), Some(42));

        let probes: Vec<Probe> = service
            .db
            .query("SELECT * FROM probe")
            .await
            .unwrap()
            .take(0)
            .unwrap();
        assert_eq!(probes.len(), 1);
    }
}
