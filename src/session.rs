// Single-item text editing session

use crate::item::DueEdit;
use crate::partition::Partitioning;
use crate::storage::Storage;
use crate::store::ItemStore;
use eyre::Result;
use tracing::debug;

/// Editing state: at most one item is being edited at a time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState<K> {
    Idle,
    Editing { key: K, index: usize, draft: String },
}

/// Result of [`EditSession::save_edit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The draft was handed to the store; `changed` is false when the store
    /// ignored it (stale index or identical text)
    Saved { changed: bool },
    /// The draft is empty after trimming; the session stays in edit mode
    Refused,
    /// No edit was in progress
    NotEditing,
}

#[derive(Debug, Clone)]
pub struct EditSession<K> {
    state: EditState<K>,
}

impl<K> Default for EditSession<K> {
    fn default() -> Self {
        Self { state: EditState::Idle }
    }
}

impl<K: Clone + Ord + std::fmt::Debug> EditSession<K> {
    pub fn new() -> Self {
        Self { state: EditState::Idle }
    }

    pub fn state(&self) -> &EditState<K> {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// Index being edited, if any
    pub fn editing_index(&self) -> Option<usize> {
        match &self.state {
            EditState::Editing { index, .. } => Some(*index),
            EditState::Idle => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Idle => None,
        }
    }

    /// Begin editing, discarding any draft already in progress
    pub fn start_edit(&mut self, key: K, index: usize, current_text: &str) {
        if let EditState::Editing { index: previous, .. } = &self.state {
            debug!(previous, index, "start_edit: discarding previous draft");
        }

        self.state = EditState::Editing {
            key,
            index,
            draft: current_text.to_string(),
        };
    }

    /// Replace the draft text; ignored while idle
    pub fn change_draft(&mut self, text: &str) {
        if let EditState::Editing { draft, .. } = &mut self.state {
            *draft = text.to_string();
        }
    }

    /// Commit the draft to `store`.
    ///
    /// An empty draft is refused and the session stays in edit mode. The due
    /// date of the edited item is left as it is.
    pub fn save_edit<P, S>(&mut self, store: &mut ItemStore<P, S>) -> Result<SaveOutcome>
    where
        P: Partitioning<Key = K>,
        S: Storage,
    {
        let EditState::Editing { key, index, draft } = &self.state else {
            return Ok(SaveOutcome::NotEditing);
        };

        if draft.trim().is_empty() {
            debug!(index, "save_edit: refused empty draft");
            return Ok(SaveOutcome::Refused);
        }

        let (key, index, draft) = (key.clone(), *index, draft.clone());
        self.state = EditState::Idle;

        let changed = store.edit(&key, index, &draft, DueEdit::Unchanged)?;
        Ok(SaveOutcome::Saved { changed })
    }

    /// Leave edit mode without touching the store
    pub fn cancel_edit(&mut self) {
        self.state = EditState::Idle;
    }
}
