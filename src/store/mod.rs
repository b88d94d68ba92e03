//! Shared task store.
//!
//! The companion app owns the data; the widget opens the same SQLite file
//! and reads the current tasks. The only writes are the completion toggle
//! and `tw seed`.

use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePool, Row};
use std::path::Path;
use thiserror::Error;

// ─── Domain model ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id:          String,
    pub title:       String,
    pub description: String,
    /// Raw ISO-8601 text as the app wrote it. Parsed only at presentation
    /// time so malformed values can surface in the UI instead of being
    /// dropped on read.
    pub due:         Option<String>,
    pub priority:    i64,
    pub completed:   bool,
}

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not prepare store directory: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

// ─── Store ────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        Ok(Self { pool: SqlitePool::connect(&url).await? })
    }

    /// Creates the tasks table when missing so a widget launched before the
    /// companion app renders an empty list instead of failing.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY, title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '', due TEXT,
                priority INTEGER NOT NULL DEFAULT 4,
                completed INTEGER NOT NULL DEFAULT 0
            )"
        ).execute(&self.pool).await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_due ON tasks(due)")
            .execute(&self.pool).await?;

        tracing::info!("task store ready");
        Ok(())
    }

    /// The widget's read: every current task, unordered. Ordering is a
    /// presentation concern (see `tasks::sort_tasks`).
    pub async fn tasks_for_today(&self) -> Result<Vec<Task>, StoreError> {
        let rows = sqlx::query("SELECT * FROM tasks")
            .fetch_all(&self.pool).await?;
        rows.iter().map(row_to_task).collect()
    }

    pub async fn upsert_task(&self, t: &Task) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO tasks (id,title,description,due,priority,completed)
             VALUES (?,?,?,?,?,?)
             ON CONFLICT(id) DO UPDATE SET
                title=excluded.title, description=excluded.description,
                due=excluded.due, priority=excluded.priority,
                completed=excluded.completed"
        )
        .bind(&t.id).bind(&t.title).bind(&t.description)
        .bind(&t.due).bind(t.priority).bind(t.completed as i32)
        .execute(&self.pool).await?;
        Ok(())
    }

    pub async fn set_completed(&self, id: &str, completed: bool) -> Result<(), StoreError> {
        sqlx::query("UPDATE tasks SET completed=? WHERE id=?")
            .bind(completed as i32).bind(id)
            .execute(&self.pool).await?;
        Ok(())
    }
}

// ─── Row helpers ──────────────────────────────────────────────────────────────

fn row_to_task(row: &sqlx::sqlite::SqliteRow) -> Result<Task, StoreError> {
    Ok(Task {
        id:          row.get("id"),
        title:       row.get("title"),
        description: row.get("description"),
        due:         row.get("due"),
        priority:    row.get("priority"),
        completed:   row.get::<i32, _>("completed") != 0,
    })
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_store() -> Store {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        let store = Store { pool };
        store.migrate().await.expect("migrate");
        store
    }

    fn sample(id: &str, due: Option<&str>) -> Task {
        Task {
            id:          id.into(),
            title:       format!("Task {id}"),
            description: "desc".into(),
            due:         due.map(str::to_owned),
            priority:    2,
            completed:   false,
        }
    }

    #[tokio::test]
    async fn upsert_then_read_round_trips() {
        let store = memory_store().await;
        let t = sample("a", Some("2024-08-09T18:00:00.000Z"));
        store.upsert_task(&t).await.unwrap();

        let tasks = store.tasks_for_today().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "a");
        assert_eq!(tasks[0].due.as_deref(), Some("2024-08-09T18:00:00.000Z"));
        assert!(!tasks[0].completed);
    }

    #[tokio::test]
    async fn upsert_overwrites_by_id() {
        let store = memory_store().await;
        store.upsert_task(&sample("a", None)).await.unwrap();

        let mut updated = sample("a", None);
        updated.title = "renamed".into();
        store.upsert_task(&updated).await.unwrap();

        let tasks = store.tasks_for_today().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "renamed");
    }

    #[tokio::test]
    async fn completion_toggle_persists() {
        let store = memory_store().await;
        store.upsert_task(&sample("a", None)).await.unwrap();

        store.set_completed("a", true).await.unwrap();
        let tasks = store.tasks_for_today().await.unwrap();
        assert!(tasks[0].completed);

        store.set_completed("a", false).await.unwrap();
        let tasks = store.tasks_for_today().await.unwrap();
        assert!(!tasks[0].completed);
    }

    #[tokio::test]
    async fn fresh_store_is_empty() {
        let store = memory_store().await;
        assert!(store.tasks_for_today().await.unwrap().is_empty());
    }
}
