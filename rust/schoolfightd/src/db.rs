use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use tracing::warn;

pub const DB_FILE_NAME: &str = "schoolfight.sqlite3";

pub const KEY_ONBOARDING_DONE: &str = "onboarding.done";
pub const KEY_USER_NAME: &str = "user.name";

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let conn = Connection::open(workspace.join(DB_FILE_NAME))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings(
            key TEXT PRIMARY KEY,
            value_json TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(conn)
}

pub fn settings_get_json(conn: &Connection, key: &str) -> anyhow::Result<Option<Value>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value_json FROM settings WHERE key = ?",
            [key],
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(s) => Ok(Some(serde_json::from_str(&s)?)),
        None => Ok(None),
    }
}

pub fn settings_set_json(conn: &Connection, key: &str, value: &Value) -> anyhow::Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO settings(key, value_json, updated_at) VALUES(?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET
             value_json = excluded.value_json,
             updated_at = excluded.updated_at",
        (key, serde_json::to_string(value)?, now),
    )?;
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub onboarding_done: bool,
    pub user_name: Option<String>,
}

/// A stored value that can't be read as expected counts as absent, so a damaged
/// store falls back to first-run behavior instead of blocking startup.
fn get_lenient(conn: &Connection, key: &str) -> anyhow::Result<Option<Value>> {
    match settings_get_json(conn, key) {
        Ok(v) => Ok(v),
        Err(e) if e.downcast_ref::<serde_json::Error>().is_some() => {
            warn!(key, error = %e, "ignoring malformed stored preference");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

pub fn load_preferences(conn: &Connection) -> anyhow::Result<Preferences> {
    let onboarding_done = match get_lenient(conn, KEY_ONBOARDING_DONE)? {
        None => false,
        Some(Value::Bool(b)) => b,
        // Written by older shells as the string "true".
        Some(Value::String(s)) => !s.is_empty(),
        Some(other) => {
            warn!(key = KEY_ONBOARDING_DONE, value = %other, "unexpected preference type");
            false
        }
    };
    let user_name = match get_lenient(conn, KEY_USER_NAME)? {
        None => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            warn!(key = KEY_USER_NAME, value = %other, "unexpected preference type");
            None
        }
    };
    Ok(Preferences {
        onboarding_done,
        user_name,
    })
}

pub fn save_onboarding_complete(conn: &Connection, user_name: &str) -> anyhow::Result<()> {
    let tx = conn.unchecked_transaction()?;
    settings_set_json(&tx, KEY_ONBOARDING_DONE, &Value::Bool(true))?;
    settings_set_json(&tx, KEY_USER_NAME, &Value::String(user_name.to_string()))?;
    tx.commit()?;
    Ok(())
}
