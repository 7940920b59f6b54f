//! Presentation state that outlives a session: menu and theme toggles, the last
//! page visited, the chat panel size and the user's own API key.
//!
//! The record is owned by whoever drives the view and handed to it explicitly;
//! stores only load and save it.

use crate::error::StateError;
use crate::page::PageId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelSize {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiState {
    pub menu_open: bool,
    pub dark_theme: bool,
    pub last_page: Option<String>,
    /// Lessons marked complete, by page id.
    pub completed: BTreeSet<String>,
    pub chat_panel: Option<PanelSize>,
    pub api_key: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            menu_open: true,
            dark_theme: false,
            last_page: None,
            completed: BTreeSet::new(),
            chat_panel: None,
            api_key: None,
        }
    }
}

impl UiState {
    /// The last page shown, resolved the same way as a location fragment.
    pub fn last_page(&self) -> PageId {
        self.last_page
            .as_deref()
            .map(PageId::from_hash)
            .unwrap_or_default()
    }

    pub fn set_last_page(&mut self, page: PageId) {
        self.last_page = Some(page.to_string());
    }

    /// Record `page` as complete. The landing page cannot be completed.
    /// Returns whether the set changed.
    pub fn mark_complete(&mut self, page: PageId) -> bool {
        if page.is_landing() {
            return false;
        }
        self.completed.insert(page.to_string())
    }

    pub fn is_complete(&self, page: PageId) -> bool {
        self.completed.contains(&page.to_string())
    }
}

pub trait StateStore {
    /// Never fails: absent or unreadable state loads as the default.
    fn load(&self) -> UiState;
    fn save(&self, state: &UiState) -> Result<(), StateError>;
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> UiState {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return UiState::default();
        };
        serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::debug!(path = %self.path.display(), error = %err, "ignoring unreadable ui state");
            UiState::default()
        })
    }

    fn save(&self, state: &UiState) -> Result<(), StateError> {
        let json = serde_json::to_string_pretty(state)?;
        let io_err = |source| StateError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, json).map_err(io_err)
    }
}

/// In-memory store, for tests and for views that do not persist.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<Option<UiState>>,
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> UiState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_default()
    }

    fn save(&self, state: &UiState) -> Result<(), StateError> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("nope.json"));
        let state = store.load();
        assert_eq!(state, UiState::default());
        assert!(state.menu_open);
    }

    #[test]
    fn corrupt_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        assert_eq!(FileStateStore::new(path).load(), UiState::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"dark_theme": true}"#).unwrap();
        let state = FileStateStore::new(path).load();
        assert!(state.dark_theme);
        assert!(state.menu_open);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::new(dir.path().join("nested/state.json"));
        let mut state = UiState::default();
        state.menu_open = false;
        state.set_last_page(PageId::Lesson(5));
        state.chat_panel = Some(PanelSize { w: 420, h: 560 });
        state.mark_complete(PageId::Lesson(1));
        store.save(&state).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, state);
        assert_eq!(loaded.last_page(), PageId::Lesson(5));
    }

    #[test]
    fn unknown_last_page_is_landing() {
        let state = UiState {
            last_page: Some("lesson-7".into()),
            ..Default::default()
        };
        assert_eq!(state.last_page(), PageId::Landing);
    }

    #[test]
    fn completion_skips_landing() {
        let mut state = UiState::default();
        assert!(!state.mark_complete(PageId::Landing));
        assert!(state.mark_complete(PageId::Lesson(3)));
        assert!(!state.mark_complete(PageId::Lesson(3)));
        assert!(state.is_complete(PageId::Lesson(3)));
        assert!(!state.is_complete(PageId::Lesson(4)));
        assert_eq!(state.completed.len(), 1);
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryStateStore::default();
        assert_eq!(store.load(), UiState::default());
        let state = UiState {
            api_key: Some("sk".into()),
            ..Default::default()
        };
        store.save(&state).unwrap();
        assert_eq!(store.load().api_key.as_deref(), Some("sk"));
    }
}
