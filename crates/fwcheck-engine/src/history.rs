//! History persistence.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};
use tracing::{debug, error};

use fwcheck_core::{CheckResult, Error, Result, Verdict};

use crate::sink::ResultSink;

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS firmware_check_history (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    input_version TEXT NOT NULL,
    popup_version TEXT,
    result        TEXT NOT NULL,
    message       TEXT NOT NULL,
    created_at    TEXT NOT NULL
)";

/// Insert-only store of check results.
pub struct HistoryStore {
    conn: Mutex<Connection>,
}

impl HistoryStore {
    /// Open (and create if needed) the history database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| Error::History(e.to_string()))?;
        Self::init(conn)
    }

    /// Open an in-memory store, for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::History(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(CREATE_TABLE, [])
            .map_err(|e| Error::History(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Append one result.
    pub fn insert(&self, result: &CheckResult) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO firmware_check_history \
             (input_version, popup_version, result, message, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                result.input_version,
                result.popup_version,
                result.verdict.as_str(),
                result.message,
                result.timestamp,
            ],
        )
        .map_err(|e| Error::History(e.to_string()))?;
        Ok(())
    }

    /// The most recent results, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<CheckResult>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT input_version, popup_version, result, message, created_at \
                 FROM firmware_check_history ORDER BY id DESC LIMIT ?1",
            )
            .map_err(|e| Error::History(e.to_string()))?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                let verdict: String = row.get(2)?;
                Ok(CheckResult {
                    input_version: row.get(0)?,
                    popup_version: row.get(1)?,
                    verdict: Verdict::from_str_opt(&verdict).unwrap_or(Verdict::Error),
                    message: row.get(3)?,
                    timestamp: row.get(4)?,
                })
            })
            .map_err(|e| Error::History(e.to_string()))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::History(e.to_string()))
    }

    /// Total number of stored results.
    pub fn count(&self) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM firmware_check_history", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|n| n as u64)
        .map_err(|e| Error::History(e.to_string()))
    }
}

/// Sink persisting every result, off the polling thread.
///
/// The first insert failure is reported once per session; later failures
/// are silent. A broken store never aborts the check pipeline.
pub struct HistorySink {
    store: Arc<HistoryStore>,
    failed_once: Arc<AtomicBool>,
}

impl HistorySink {
    /// Wrap a store.
    pub fn new(store: Arc<HistoryStore>) -> Self {
        Self {
            store,
            failed_once: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether an insert failure has been reported this session.
    pub fn failure_reported(&self) -> bool {
        self.failed_once.load(Ordering::SeqCst)
    }

    fn insert_guarded(store: &HistoryStore, failed_once: &AtomicBool, result: &CheckResult) {
        if let Err(e) = store.insert(result) {
            if !failed_once.swap(true, Ordering::SeqCst) {
                error!("history insert failed (further failures muted): {e}");
            } else {
                debug!("history insert failed: {e}");
            }
        }
    }
}

impl ResultSink for HistorySink {
    fn publish(&self, result: &CheckResult, _modal: bool) {
        let store = Arc::clone(&self.store);
        let failed_once = Arc::clone(&self.failed_once);
        let result = result.clone();

        // Inside a runtime the insert runs as a fire-and-forget blocking
        // task; without one (unit tests, teardown) it runs inline.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || {
                    Self::insert_guarded(&store, &failed_once, &result);
                });
            }
            Err(_) => Self::insert_guarded(&store, &failed_once, &result),
        }
    }
}
