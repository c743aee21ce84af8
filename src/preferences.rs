use crate::errors::StoreError;
use crate::persisted::Persisted;
use crate::storage::{Backend, SharedBackend};
use tracing::info;

pub const DARK_MODE_KEY: &str = "darkMode";
pub const WELCOME_KEY: &str = "welcomeSeen";
const WELCOME_SENTINEL: &str = "1";

/// Dark-mode flag and the first-run tutorial marker.
pub struct Preferences {
    dark_mode: Persisted<bool>,
    backend: SharedBackend,
}

impl Preferences {
    pub fn open(backend: SharedBackend, prefers_dark: bool) -> Result<Self, StoreError> {
        let dark_mode = Persisted::init(backend.clone(), DARK_MODE_KEY, prefers_dark)?;
        Ok(Self { dark_mode, backend })
    }

    pub fn dark_mode(&self) -> bool {
        *self.dark_mode.get()
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.dark_mode.set(enabled)?;
        info!("dark mode set to {enabled}");
        Ok(())
    }

    // Stored as a bare string, not JSON.
    pub fn welcome_seen(&self) -> Result<bool, StoreError> {
        Ok(self.backend.read(WELCOME_KEY)?.is_some())
    }

    pub fn dismiss_welcome(&self) -> Result<(), StoreError> {
        self.backend.write(WELCOME_KEY, WELCOME_SENTINEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    #[test]
    fn dark_mode_defaults_to_preference_until_set() {
        let backend = MemoryBackend::shared();
        let mut prefs = Preferences::open(backend.clone(), true).unwrap();
        assert!(prefs.dark_mode());

        prefs.set_dark_mode(false).unwrap();
        let reopened = Preferences::open(backend, true).unwrap();
        assert!(!reopened.dark_mode());
    }

    #[test]
    fn welcome_is_dismissed_with_plain_sentinel() {
        let backend = MemoryBackend::shared();
        let prefs = Preferences::open(backend.clone(), false).unwrap();
        assert!(!prefs.welcome_seen().unwrap());

        prefs.dismiss_welcome().unwrap();
        assert!(prefs.welcome_seen().unwrap());
        assert_eq!(backend.read(WELCOME_KEY).unwrap().as_deref(), Some("1"));
    }
}
