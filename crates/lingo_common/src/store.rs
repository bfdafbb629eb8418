//! Profile Store - SQLite-backed persistence for user profiles.
//!
//! One table, `user_profile`. The language list and the current language are
//! stored as JSON columns. The schema version lives in `PRAGMA user_version`;
//! a mismatch drops and recreates the table.

use crate::error::{LingoError, Result};
use crate::models::{LanguageProgress, UserProfile};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Bump on any change to the `user_profile` layout
pub const SCHEMA_VERSION: i32 = 2;

const PROFILE_COLUMNS: &str = "id, username, weekly_points, languages, current_language, \
                               total_exercises_done, total_points, week_start";

/// Persistence gateway for `UserProfile` rows
pub struct ProfileStore {
    conn: Arc<Mutex<Connection>>,
    db_path: Option<PathBuf>,
}

impl ProfileStore {
    /// Open or create the store at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Opening profile database at: {}", path.display());
        let conn = Connection::open(path)?;
        Self::from_connection(conn, Some(path.to_path_buf()))
    }

    /// Volatile store, used by tests
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    fn from_connection(conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path,
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| LingoError::Internal("profile database lock poisoned".to_string()))
    }

    /// Create the table, dropping it first when the stored version differs
    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        if version != SCHEMA_VERSION {
            if version != 0 {
                warn!(
                    "Profile schema v{} does not match v{}; discarding stored profiles",
                    version, SCHEMA_VERSION
                );
            }
            conn.execute("DROP TABLE IF EXISTS user_profile", [])?;
        }

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS user_profile (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                weekly_points INTEGER NOT NULL DEFAULT 0,
                languages TEXT NOT NULL,
                current_language TEXT NOT NULL,
                total_exercises_done INTEGER NOT NULL DEFAULT 0,
                total_points INTEGER NOT NULL DEFAULT 0,
                week_start TEXT
            )
            "#,
            [],
        )?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(())
    }

    /// Insert a new row and return its generated id
    pub fn insert(&self, profile: &UserProfile) -> Result<i64> {
        let languages = serde_json::to_string(&profile.languages)?;
        let current = serde_json::to_string(&profile.current_language)?;
        let conn = self.lock()?;

        conn.execute(
            r#"
            INSERT INTO user_profile
                (username, weekly_points, languages, current_language,
                 total_exercises_done, total_points, week_start)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                &profile.username,
                profile.weekly_points,
                languages,
                current,
                profile.total_exercises_done,
                profile.total_points,
                profile.week_start,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Inserted profile {} ({})", id, profile.username);
        Ok(id)
    }

    /// Replace the row matching `profile.id`
    pub fn update(&self, profile: &UserProfile) -> Result<()> {
        let languages = serde_json::to_string(&profile.languages)?;
        let current = serde_json::to_string(&profile.current_language)?;
        let conn = self.lock()?;

        let changed = conn.execute(
            r#"
            UPDATE user_profile SET
                username = ?,
                weekly_points = ?,
                languages = ?,
                current_language = ?,
                total_exercises_done = ?,
                total_points = ?,
                week_start = ?
            WHERE id = ?
            "#,
            params![
                &profile.username,
                profile.weekly_points,
                languages,
                current,
                profile.total_exercises_done,
                profile.total_points,
                profile.week_start,
                profile.id,
            ],
        )?;

        if changed == 0 {
            return Err(LingoError::NotFound(profile.id));
        }
        debug!("Updated profile {}", profile.id);
        Ok(())
    }

    /// Every stored profile (ordered by id)
    pub fn list_all(&self) -> Result<Vec<UserProfile>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM user_profile ORDER BY id",
            PROFILE_COLUMNS
        ))?;

        let rows = stmt.query_map([], raw_row)?;
        let mut profiles = Vec::new();
        for raw in rows {
            profiles.push(raw?.decode()?);
        }
        Ok(profiles)
    }

    /// Remove every row
    pub fn clear(&self) -> Result<()> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM user_profile", [])?;
        info!("Cleared profile store ({} rows)", removed);
        Ok(())
    }

    /// The single profile, created on first use
    pub fn load_or_create(&self, username: &str, language: &str) -> Result<UserProfile> {
        if let Some(profile) = self.list_all()?.into_iter().next() {
            return Ok(profile);
        }

        let mut profile = UserProfile::new(username, language);
        profile.id = self.insert(&profile)?;
        info!("Created profile for {} learning {}", username, language);
        Ok(profile)
    }
}

/// Row as stored, before the JSON columns are decoded
struct RawProfile {
    id: i64,
    username: String,
    weekly_points: u32,
    languages: String,
    current_language: String,
    total_exercises_done: u32,
    total_points: u32,
    week_start: Option<NaiveDate>,
}

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawProfile> {
    Ok(RawProfile {
        id: row.get(0)?,
        username: row.get(1)?,
        weekly_points: row.get(2)?,
        languages: row.get(3)?,
        current_language: row.get(4)?,
        total_exercises_done: row.get(5)?,
        total_points: row.get(6)?,
        week_start: row.get(7)?,
    })
}

impl RawProfile {
    fn decode(self) -> Result<UserProfile> {
        let languages: Vec<LanguageProgress> = serde_json::from_str(&self.languages)?;
        let current_language: LanguageProgress = serde_json::from_str(&self.current_language)?;
        Ok(UserProfile {
            id: self.id,
            username: self.username,
            weekly_points: self.weekly_points,
            languages,
            current_language,
            total_exercises_done: self.total_exercises_done,
            total_points: self.total_points,
            week_start: self.week_start,
        })
    }
}

/// Async handle over a shared `ProfileStore`.
///
/// Every call runs on the blocking pool so the caller's task never waits on
/// SQLite. Concurrent writes resolve last-writer-wins.
#[derive(Clone)]
pub struct ProfileRepository {
    store: Arc<ProfileStore>,
}

impl ProfileRepository {
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    async fn run<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&ProfileStore) -> Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| {
                if e.is_cancelled() {
                    LingoError::Cancelled
                } else {
                    LingoError::Internal(format!("store task panicked: {}", e))
                }
            })?
    }

    pub async fn insert(&self, profile: UserProfile) -> Result<i64> {
        self.run(move |s| s.insert(&profile)).await
    }

    pub async fn update(&self, profile: UserProfile) -> Result<()> {
        self.run(move |s| s.update(&profile)).await
    }

    pub async fn list_all(&self) -> Result<Vec<UserProfile>> {
        self.run(|s| s.list_all()).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.run(|s| s.clear()).await
    }

    pub async fn load_or_create(&self, username: &str, language: &str) -> Result<UserProfile> {
        let username = username.to_string();
        let language = language.to_string();
        self.run(move |s| s.load_or_create(&username, &language))
            .await
    }
}
