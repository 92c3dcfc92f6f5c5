// src/store/mod.rs — Durable key-value store for users and session collections
//
// Values are JSON documents. Two keys are in use:
//   current_user        → the logged-in User
//   sessions:<email>    → that user's ordered ChatSession list

pub mod file;
pub mod memory;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::infra::errors::PersistenceError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the logged-in user.
pub const CURRENT_USER_KEY: &str = "current_user";

/// Key holding the session collection of one user.
pub fn sessions_key(email: &str) -> String {
    format!("sessions:{email}")
}

/// Raw string key-value storage. Implementations must make `set` durable
/// before returning `Ok`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Read and decode a JSON value. A value that exists but does not decode is
/// reported as `Corrupt`, never silently treated as absent.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, PersistenceError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| PersistenceError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
}

/// Encode a value as JSON and write it under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(value)?;
    store.set(key, &json)
}
