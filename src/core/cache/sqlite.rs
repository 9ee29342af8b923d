//! SQLite cache backend for persistence across sessions.

use super::{CacheBackend, CacheEntry, CacheStats};
use crate::core::hasher::HashAlgorithmKind;
use crate::error::CacheError;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// SQLite-backed persistent cache.
///
/// Runs in WAL mode so readers can proceed while a write is in flight.
pub struct SqliteCache {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteCache {
    /// Open or create a cache database at the given path
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::OpenFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let conn = Connection::open(path).map_err(|e| CacheError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| CacheError::QueryFailed(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS fingerprints (
                path TEXT PRIMARY KEY,
                file_size INTEGER NOT NULL,
                file_modified INTEGER NOT NULL,
                content_digest BLOB,
                perceptual TEXT NOT NULL,
                cached_at INTEGER NOT NULL
            )",
            [],
        )
        .map_err(|e| CacheError::QueryFailed(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: path.to_path_buf(),
        })
    }

    fn to_timestamp(time: SystemTime) -> i64 {
        time.duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs() as i64
    }

    fn from_timestamp(timestamp: i64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(timestamp as u64)
    }

    fn encode_perceptual(
        hashes: &BTreeMap<HashAlgorithmKind, Vec<u8>>,
    ) -> Result<String, CacheError> {
        serde_json::to_string(hashes).map_err(|e| CacheError::SerializationFailed(e.to_string()))
    }

    fn decode_perceptual(json: &str) -> Result<BTreeMap<HashAlgorithmKind, Vec<u8>>, CacheError> {
        serde_json::from_str(json).map_err(|e| CacheError::SerializationFailed(e.to_string()))
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::Corrupted {
            path: self.db_path.clone(),
        })
    }
}

impl CacheBackend for SqliteCache {
    fn get(
        &self,
        path: &Path,
        current_size: u64,
        current_modified: SystemTime,
    ) -> Result<Option<CacheEntry>, CacheError> {
        let conn = self.lock()?;
        let path_str = path.to_string_lossy();

        let row: Result<(i64, i64, Option<Vec<u8>>, String, i64), _> = conn.query_row(
            "SELECT file_size, file_modified, content_digest, perceptual, cached_at
             FROM fingerprints WHERE path = ?",
            [&path_str],
            |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                ))
            },
        );

        match row {
            Ok((file_size, file_modified, content_digest, perceptual, cached_at)) => {
                let entry = CacheEntry {
                    path: path.to_path_buf(),
                    file_size: file_size as u64,
                    file_modified: Self::from_timestamp(file_modified),
                    content_digest,
                    perceptual_hashes: Self::decode_perceptual(&perceptual)?,
                    cached_at: Self::from_timestamp(cached_at),
                };

                if entry.is_valid_for(current_size, current_modified) {
                    Ok(Some(entry))
                } else {
                    Ok(None)
                }
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(CacheError::QueryFailed(e.to_string())),
        }
    }

    fn set(&self, entry: CacheEntry) -> Result<(), CacheError> {
        let perceptual = Self::encode_perceptual(&entry.perceptual_hashes)?;
        let conn = self.lock()?;
        let path_str = entry.path.to_string_lossy();

        conn.execute(
            "INSERT OR REPLACE INTO fingerprints
             (path, file_size, file_modified, content_digest, perceptual, cached_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                path_str,
                entry.file_size as i64,
                Self::to_timestamp(entry.file_modified),
                entry.content_digest,
                perceptual,
                Self::to_timestamp(entry.cached_at),
            ],
        )
        .map_err(|e| CacheError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    fn remove(&self, path: &Path) -> Result<(), CacheError> {
        let conn = self.lock()?;
        let path_str = path.to_string_lossy();

        conn.execute("DELETE FROM fingerprints WHERE path = ?", [&path_str])
            .map_err(|e| CacheError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let conn = self.lock()?;

        conn.execute("DELETE FROM fingerprints", [])
            .map_err(|e| CacheError::QueryFailed(e.to_string()))?;

        Ok(())
    }

    fn stats(&self) -> Result<CacheStats, CacheError> {
        let conn = self.lock()?;

        let total_entries: usize = conn
            .query_row("SELECT COUNT(*) FROM fingerprints", [], |row| {
                row.get::<_, i64>(0).map(|v| v as usize)
            })
            .map_err(|e| CacheError::QueryFailed(e.to_string()))?;

        let total_size_bytes: u64 = conn
            .query_row(
                "SELECT COALESCE(SUM(COALESCE(LENGTH(content_digest), 0) + LENGTH(perceptual)), 0)
                 FROM fingerprints",
                [],
                |row| row.get::<_, i64>(0).map(|v| v as u64),
            )
            .map_err(|e| CacheError::QueryFailed(e.to_string()))?;

        let oldest_entry: Option<SystemTime> = conn
            .query_row("SELECT MIN(cached_at) FROM fingerprints", [], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .map_err(|e| CacheError::QueryFailed(e.to_string()))?
            .map(Self::from_timestamp);

        let newest_entry: Option<SystemTime> = conn
            .query_row("SELECT MAX(cached_at) FROM fingerprints", [], |row| {
                row.get::<_, Option<i64>>(0)
            })
            .map_err(|e| CacheError::QueryFailed(e.to_string()))?
            .map(Self::from_timestamp);

        Ok(CacheStats {
            total_entries,
            total_size_bytes,
            oldest_entry,
            newest_entry,
        })
    }

    fn prune_orphans(&self) -> Result<usize, CacheError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare("SELECT path FROM fingerprints")
            .map_err(|e| CacheError::QueryFailed(e.to_string()))?;

        let paths: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .map_err(|e| CacheError::QueryFailed(e.to_string()))?
            .filter_map(|r| r.ok())
            .collect();

        drop(stmt);

        let mut count = 0;
        for path in paths {
            if !Path::new(&path).exists() {
                conn.execute("DELETE FROM fingerprints WHERE path = ?", [&path])
                    .map_err(|e| CacheError::QueryFailed(e.to_string()))?;
                count += 1;
            }
        }

        Ok(count)
    }
}
