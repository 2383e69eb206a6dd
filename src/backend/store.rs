#[cfg(not(target_arch = "wasm32"))]
use rusqlite::{params, Connection, OptionalExtension};
#[cfg(target_arch = "wasm32")]
use std::collections::HashMap;
#[cfg(target_arch = "wasm32")]
use std::sync::{Arc, Mutex};
use std::path::Path;
use crate::backend::profile::SessionRecord;

/// Key under which the logged-in session record is kept.
pub const USER_INFO_KEY: &str = "userInfo";

/// Durable key/value storage for the client: SQLite on native, `localStorage` in the browser.
#[derive(Clone)]
pub struct Store {
    #[cfg(not(target_arch = "wasm32"))]
    conn: std::sync::Arc<std::sync::Mutex<Connection>>,
    #[cfg(target_arch = "wasm32")]
    memory: Option<Arc<Mutex<HashMap<String, String>>>>,
}

#[cfg(not(target_arch = "wasm32"))]
fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, Box<dyn std::error::Error>> {
    let window = web_sys::window().ok_or("no window")?;
    let storage = window
        .local_storage()
        .map_err(|_| "localStorage unavailable")?
        .ok_or("localStorage disabled")?;
    Ok(storage)
}

impl Store {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open(path)?;
        create_schema(&conn)?;
        Ok(Self { conn: std::sync::Arc::new(std::sync::Mutex::new(conn)) })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new<P: AsRef<Path>>(_path: P) -> Result<Self, Box<dyn std::error::Error>> {
        // Fail early if the browser has storage turned off.
        local_storage()?;
        Ok(Self { memory: None })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new_in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;
        Ok(Self { conn: std::sync::Arc::new(std::sync::Mutex::new(conn)) })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn new_in_memory() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self { memory: Some(Arc::new(Mutex::new(HashMap::new()))) })
    }

    pub fn put(&self, key: &str, value: &str) -> Result<(), Box<dyn std::error::Error>> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let conn = self.conn.lock().map_err(|_| "store lock poisoned")?;
            conn.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
        }

        #[cfg(target_arch = "wasm32")]
        {
            match &self.memory {
                Some(memory) => {
                    let mut map = memory.lock().map_err(|_| "store lock poisoned")?;
                    map.insert(key.to_string(), value.to_string());
                }
                None => {
                    local_storage()?
                        .set_item(key, value)
                        .map_err(|_| "localStorage write rejected")?;
                }
            }
        }

        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, Box<dyn std::error::Error>> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let conn = self.conn.lock().map_err(|_| "store lock poisoned")?;
            let value = conn
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
                .optional()?;
            Ok(value)
        }

        #[cfg(target_arch = "wasm32")]
        {
            match &self.memory {
                Some(memory) => {
                    let map = memory.lock().map_err(|_| "store lock poisoned")?;
                    Ok(map.get(key).cloned())
                }
                None => Ok(local_storage()?
                    .get_item(key)
                    .map_err(|_| "localStorage read rejected")?),
            }
        }
    }

    pub fn remove(&self, key: &str) -> Result<(), Box<dyn std::error::Error>> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let conn = self.conn.lock().map_err(|_| "store lock poisoned")?;
            conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        }

        #[cfg(target_arch = "wasm32")]
        {
            match &self.memory {
                Some(memory) => {
                    let mut map = memory.lock().map_err(|_| "store lock poisoned")?;
                    map.remove(key);
                }
                None => {
                    local_storage()?
                        .remove_item(key)
                        .map_err(|_| "localStorage write rejected")?;
                }
            }
        }

        Ok(())
    }

    /// Overwrites the stored session with `record`.
    pub fn save_session(&self, record: &SessionRecord) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string(record)?;
        self.put(USER_INFO_KEY, &json)
    }

    pub fn load_session(&self) -> Result<Option<SessionRecord>, Box<dyn std::error::Error>> {
        let Some(raw) = self.get(USER_INFO_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!("Discarding unreadable {} entry: {}", USER_INFO_KEY, e);
                Ok(None)
            }
        }
    }

    pub fn clear_session(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.remove(USER_INFO_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::profile::{UserId, UserProfile};
    use tempfile::tempdir;

    fn record(token: &str) -> SessionRecord {
        let user = UserProfile {
            id: Some(UserId::Text("abc".into())),
            first_name: Some("Ada".into()),
            ..Default::default()
        };
        SessionRecord::merge(user, Some(token.into()))
    }

    #[test]
    fn test_put_get_remove() {
        let store = Store::new_in_memory().unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.put("k", "v1").unwrap();
        store.put("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_session_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.db");

        {
            let store = Store::new(&path).unwrap();
            store.save_session(&record("first")).unwrap();
            store.save_session(&record("second")).unwrap();
        }

        let store = Store::new(&path).unwrap();
        let loaded = store.load_session().unwrap().expect("session should be stored");
        assert_eq!(loaded.token(), Some("second"));
        assert_eq!(loaded.user().first_name.as_deref(), Some("Ada"));

        let raw = store.get(USER_INFO_KEY).unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["token"], "second");
        assert_eq!(json["_id"], "abc");
    }

    #[test]
    fn test_corrupt_session_is_treated_as_absent() {
        let store = Store::new_in_memory().unwrap();
        store.put(USER_INFO_KEY, "{not json").unwrap();
        assert!(store.load_session().unwrap().is_none());

        store.save_session(&record("t")).unwrap();
        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }
}
