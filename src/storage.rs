/// Storage model for browser.storage.local

use crate::tab_data::{TabId, TabRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of the tab history blob
pub const HISTORY_KEY: &str = "tabHistory";

/// Key of the save method preference
pub const SAVE_METHOD_KEY: &str = "saveMethod";

/// What happens to the generated markdown when tabs are saved
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SaveMethod {
    /// Open the editor page with the document
    #[default]
    Editor,
    /// Download straight to the default location
    Direct,
    /// Copy to the clipboard
    Clipboard,
}

impl SaveMethod {
    pub const ALL: [SaveMethod; 3] = [SaveMethod::Editor, SaveMethod::Direct, SaveMethod::Clipboard];

    pub fn as_str(self) -> &'static str {
        match self {
            SaveMethod::Editor => "editor",
            SaveMethod::Direct => "direct",
            SaveMethod::Clipboard => "clipboard",
        }
    }

    /// Unknown or missing values fall back to the editor
    pub fn parse(value: Option<&str>) -> SaveMethod {
        match value {
            Some("direct") => SaveMethod::Direct,
            Some("clipboard") => SaveMethod::Clipboard,
            _ => SaveMethod::Editor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SaveMethod::Editor => "Open in editor",
            SaveMethod::Direct => "Download directly",
            SaveMethod::Clipboard => "Copy to clipboard",
        }
    }
}

/// Per-tab usage history, keyed by tab id.
///
/// The background page loads this once and keeps it in memory; every
/// mutation goes through `record_mut`/`remove`, which raise the dirty
/// flag so the owner knows a snapshot has to be written back.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TabHistory {
    records: BTreeMap<TabId, TabRecord>,
    #[serde(skip)]
    dirty: bool,
}

impl TabHistory {
    pub fn new() -> Self {
        TabHistory::default()
    }

    /// Parse the stored JSON blob; anything unreadable is an empty history
    pub fn from_json(json: &str) -> Result<Self, String> {
        if json.trim().is_empty() || json == "null" || json == "undefined" {
            return Ok(TabHistory::new());
        }
        serde_json::from_str(json).map_err(|e| format!("Failed to parse tab history: {}", e))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("Failed to serialize tab history: {}", e))
    }

    pub fn get(&self, tab_id: TabId) -> Option<&TabRecord> {
        self.records.get(&tab_id)
    }

    pub fn insert(&mut self, tab_id: TabId, record: TabRecord) {
        self.records.insert(tab_id, record);
        self.dirty = true;
    }

    /// Mutable access to a record, creating an empty one if missing
    pub fn record_mut(&mut self, tab_id: TabId) -> &mut TabRecord {
        self.dirty = true;
        self.records.entry(tab_id).or_default()
    }

    /// Mutable access to an existing record only
    pub fn existing_mut(&mut self, tab_id: TabId) -> Option<&mut TabRecord> {
        let record = self.records.get_mut(&tab_id)?;
        self.dirty = true;
        Some(record)
    }

    pub fn remove(&mut self, tab_id: TabId) -> bool {
        let removed = self.records.remove(&tab_id).is_some();
        self.dirty |= removed;
        removed
    }

    /// Ids of tabs with an activation still in progress
    pub fn active_ids(&self) -> Vec<TabId> {
        self.records
            .iter()
            .filter(|(_, record)| record.is_active())
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Force the next flush, e.g. to create the stored blob
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Serialized snapshot if anything changed since the last flush
    pub fn take_dirty_json(&mut self) -> Result<Option<String>, String> {
        if !self.dirty {
            return Ok(None);
        }
        let json = self.to_json()?;
        self.dirty = false;
        Ok(Some(json))
    }
}
