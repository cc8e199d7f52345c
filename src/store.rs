//! SQLite-backed Idea Record Store.
//!
//! Write takes `{owner, contact, idea text, analysis?}` and returns a generated id; the
//! store assigns `submitted_at` itself. Reads are filtered by owner and come back in no
//! particular order: callers sort (see `history::load_history`).

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;

pub const DEFAULT_STORE_PATH: &str = ".ideaforge.sqlite";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// One stored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaRecord {
    pub id: String,
    pub owner_id: String,
    pub owner_email: String,
    pub owner_name: String,
    pub idea_text: String,
    pub contact: Contact,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

impl IdeaRecord {
    pub fn score_value(&self) -> Option<f64> {
        self.analysis.as_ref().and_then(AnalysisResult::score_value)
    }

    pub fn pitch(&self) -> Option<&str> {
        self.analysis.as_ref().and_then(AnalysisResult::pitch)
    }
}

/// Write payload. `id` and `submitted_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewIdeaRecord {
    pub owner_id: String,
    pub owner_email: String,
    pub owner_name: String,
    pub idea_text: String,
    pub contact: Contact,
    pub analysis: Option<AnalysisResult>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("task join error: {0}")]
    Join(String),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

#[async_trait]
pub trait IdeaStore: Send + Sync {
    /// Persist a new record and return its generated id.
    async fn create(&self, record: NewIdeaRecord) -> Result<String, StoreError>;

    /// All records owned by `owner_id`, unordered. Undecodable rows are skipped.
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<IdeaRecord>, StoreError>;

    async fn get(&self, owner_id: &str, id: &str) -> Result<Option<IdeaRecord>, StoreError>;
}

#[derive(Clone)]
pub struct SqliteIdeaStore {
    path: Option<PathBuf>,
    conn: Arc<Mutex<Connection>>,
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS ideas (\
       id TEXT PRIMARY KEY,\
       owner_id TEXT NOT NULL,\
       owner_email TEXT NOT NULL,\
       owner_name TEXT NOT NULL,\
       idea_text TEXT NOT NULL,\
       contact_name TEXT NOT NULL,\
       contact_email TEXT NOT NULL,\
       contact_phone TEXT NOT NULL,\
       submitted_at TEXT NOT NULL,\
       analysis_json TEXT\
     );\
     CREATE INDEX IF NOT EXISTS ideas_owner ON ideas(owner_id);";

const SELECT_COLUMNS: &str = "SELECT id, owner_id, owner_email, owner_name, idea_text,\
        contact_name, contact_email, contact_phone, submitted_at, analysis_json \
     FROM ideas";

impl SqliteIdeaStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            path: Some(path),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            path: None,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn with_conn<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&Connection) -> Result<R, StoreError>,
    {
        let guard = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&guard)
    }

    async fn blocking<F, R>(&self, f: F) -> Result<R, StoreError>
    where
        F: FnOnce(&Connection) -> Result<R, StoreError> + Send + 'static,
        R: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.with_conn(f))
            .await
            .map_err(|e| StoreError::Join(e.to_string()))?
    }
}

#[async_trait]
impl IdeaStore for SqliteIdeaStore {
    async fn create(&self, record: NewIdeaRecord) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let submitted_at = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);
        let analysis_json = record
            .analysis
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let row_id = id.clone();
        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO ideas (\
                    id, owner_id, owner_email, owner_name, idea_text,\
                    contact_name, contact_email, contact_phone, submitted_at, analysis_json\
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    row_id,
                    record.owner_id,
                    record.owner_email,
                    record.owner_name,
                    record.idea_text,
                    record.contact.name,
                    record.contact.email,
                    record.contact.phone,
                    submitted_at,
                    analysis_json,
                ],
            )?;
            Ok(())
        })
        .await?;

        tracing::debug!(record_id = %id, "idea record created");
        Ok(id)
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<IdeaRecord>, StoreError> {
        let owner_id = owner_id.to_string();
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} WHERE owner_id = ?1"))?;
            let mut rows = stmt.query(params![owner_id])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                match read_record(row) {
                    Ok(record) => out.push(record),
                    Err(StoreError::Corrupt { id, reason }) => {
                        tracing::warn!(record_id = %id, %reason, "skipping undecodable idea record");
                    }
                    Err(err) => return Err(err),
                }
            }
            Ok(out)
        })
        .await
    }

    async fn get(&self, owner_id: &str, id: &str) -> Result<Option<IdeaRecord>, StoreError> {
        let owner_id = owner_id.to_string();
        let id = id.to_string();
        self.blocking(move |conn| {
            let mut stmt =
                conn.prepare(&format!("{SELECT_COLUMNS} WHERE owner_id = ?1 AND id = ?2"))?;
            let mut rows = stmt.query(params![owner_id, id])?;
            match rows.next()? {
                Some(row) => Ok(Some(read_record(row)?)),
                None => Ok(None),
            }
        })
        .await
    }
}

fn read_record(row: &Row<'_>) -> Result<IdeaRecord, StoreError> {
    let id: String = row.get(0)?;
    let submitted_raw: String = row.get(8)?;
    let submitted_at = DateTime::parse_from_rfc3339(&submitted_raw)
        .map_err(|e| StoreError::Corrupt {
            id: id.clone(),
            reason: format!("submitted_at: {e}"),
        })?
        .with_timezone(&Utc);

    let analysis = row
        .get::<_, Option<String>>(9)?
        .map(|json| serde_json::from_str::<AnalysisResult>(&json))
        .transpose()
        .map_err(|e| StoreError::Corrupt {
            id: id.clone(),
            reason: format!("analysis: {e}"),
        })?;

    Ok(IdeaRecord {
        id,
        owner_id: row.get(1)?,
        owner_email: row.get(2)?,
        owner_name: row.get(3)?,
        idea_text: row.get(4)?,
        contact: Contact {
            name: row.get(5)?,
            email: row.get(6)?,
            phone: row.get(7)?,
        },
        submitted_at,
        analysis,
    })
}
