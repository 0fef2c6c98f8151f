use crate::models::LibraryItem;
use crate::store::KeyValueStore;
use eyre::Result;
use rusqlite::{Connection, params};

// Re-use the get_app_data_prefix from config.rs
use crate::config::get_app_data_prefix;

pub struct State {
    conn: Connection,
}

impl State {
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        let filepath = prefix.join("states.db");

        if let Some(parent) = filepath.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&filepath)?;

        // Tables are created only if missing, so this is safe to run on an
        // existing database.
        Self::init_db(&conn)?;

        Ok(Self { conn })
    }

    fn init_db(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS library (
                last_read DATETIME DEFAULT (datetime('now')),
                filepath TEXT PRIMARY KEY,
                title TEXT,
                story_count INTEGER,
                reading_progress REAL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT
            );
            ",
        )?;
        Ok(())
    }

    /// Short stable key for a story export, used to namespace kv entries.
    pub fn book_key(filepath: &str) -> String {
        use sha1::{Digest, Sha1};
        let mut hasher = Sha1::new();
        hasher.update(filepath.as_bytes());
        let hash = hasher.finalize();
        hex::encode(hash)[..10].to_string()
    }

    pub fn get_from_history(&self) -> Result<Vec<LibraryItem>> {
        let mut stmt = self.conn.prepare(
            "SELECT last_read, filepath, title, story_count, reading_progress FROM library ORDER BY last_read DESC",
        )?;

        let library_items_iter = stmt.query_map([], |row| {
            Ok(LibraryItem {
                last_read: row.get(0)?,
                filepath: row.get(1)?,
                title: row.get(2)?,
                story_count: row.get(3)?,
                reading_progress: row.get(4)?,
            })
        })?;

        let mut library_items = Vec::new();
        for item_result in library_items_iter {
            library_items.push(item_result?);
        }

        Ok(library_items)
    }

    pub fn update_library(
        &self,
        filepath: &str,
        title: Option<&str>,
        story_count: Option<i64>,
        reading_progress: Option<f32>,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO library (filepath, title, story_count, reading_progress) VALUES (?, ?, ?, ?)",
            params![filepath, title, story_count, reading_progress],
        )?;
        Ok(())
    }

    pub fn delete_from_library(&self, filepath: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM library WHERE filepath=?", params![filepath])?;
        Ok(())
    }

    pub fn get_last_read(&self) -> Result<Option<String>> {
        let library = self.get_from_history()?;
        Ok(library.into_iter().next().map(|item| item.filepath))
    }
}

impl KeyValueStore for State {
    fn get(&self, key: &str) -> Option<String> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key=?", params![key], |row| {
                row.get(0)
            })
            .ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(err) = self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?, ?)",
            params![key, value],
        ) {
            crate::logging::warn(format!("failed to persist {}: {}", key, err));
        }
    }
}
