use crate::errors::StoreError;
use crate::storage::{Backend, SharedBackend};
use serde::{Serialize, de::DeserializeOwned};
use tracing::warn;

/// A typed value mirrored to one key of the backend.
///
/// The stored form is JSON. Reads happen once, at [`Persisted::init`]; every
/// [`Persisted::set`] writes through.
pub struct Persisted<T> {
    key: String,
    value: T,
    backend: SharedBackend,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Loads the value stored under `key`, or `initial` when there is none.
    ///
    /// A stored value that does not deserialize is logged and replaced by
    /// `initial` in memory; the entry itself is left alone until the next set.
    pub fn init(backend: SharedBackend, key: impl Into<String>, initial: T) -> Result<Self, StoreError> {
        let key = key.into();
        let value = match backend.read(&key)? {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(err) => {
                    warn!("ignoring malformed value stored under '{key}': {err}");
                    initial
                }
            },
            None => initial,
        };

        Ok(Self { key, value, backend })
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn set(&mut self, value: T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&value).map_err(|source| StoreError::Serialize {
            key: self.key.clone(),
            source,
        })?;
        self.backend.write(&self.key, &raw)?;
        self.value = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    #[test]
    fn init_falls_back_to_initial_value() {
        let backend = MemoryBackend::shared();
        let flag = Persisted::init(backend, "darkMode", true).unwrap();
        assert!(*flag.get());
    }

    #[test]
    fn set_writes_json_under_key() {
        let backend = MemoryBackend::shared();
        let mut flag = Persisted::init(backend.clone(), "darkMode", false).unwrap();
        flag.set(true).unwrap();

        assert_eq!(backend.read("darkMode").unwrap().as_deref(), Some("true"));
        let reloaded = Persisted::init(backend, "darkMode", false).unwrap();
        assert!(*reloaded.get());
    }

    #[test]
    fn malformed_value_uses_initial() {
        let backend = MemoryBackend::shared();
        backend.write("darkMode", "maybe").unwrap();

        let flag = Persisted::init(backend.clone(), "darkMode", false).unwrap();
        assert!(!*flag.get());
        assert_eq!(backend.read("darkMode").unwrap().as_deref(), Some("maybe"));
    }
}
