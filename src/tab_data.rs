/// Data structures for Tab Saver
use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier
pub type TabId = i32;

/// Container id Firefox reports for tabs outside any container
pub const DEFAULT_CONTAINER: &str = "firefox-default";

/// Mute state as reported by the browser
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MutedInfo {
    #[serde(default)]
    pub muted: bool,
}

/// Information about a live browser tab
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: TabId,
    #[serde(default)]
    pub index: i32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub audible: bool,
    #[serde(default)]
    pub muted_info: Option<MutedInfo>,
    #[serde(default)]
    pub cookie_store_id: Option<String>,
    #[serde(default)]
    pub opener_tab_id: Option<TabId>,
}

impl TabInfo {
    pub fn new(id: TabId, index: i32, url: String, title: String) -> TabInfo {
        TabInfo {
            id,
            index,
            url,
            title: Some(title),
            ..TabInfo::default()
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted_info.as_ref().is_some_and(|info| info.muted)
    }

    /// Container id, unless the tab lives in the default container
    pub fn container(&self) -> Option<&str> {
        self.cookie_store_id
            .as_deref()
            .filter(|id| !id.is_empty() && *id != DEFAULT_CONTAINER)
    }
}

/// A URL the tab navigated away from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreviousUrl {
    pub url: String,
    pub timestamp: f64,
}

/// Usage history of one tab, persisted between browser sessions.
///
/// Field names follow the camelCase layout of the stored blob. Every field
/// defaults, so a partially written record loads as an "empty" record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TabRecord {
    pub first_opened: Option<f64>,
    pub last_accessed: Option<f64>,
    pub total_active_time: f64,
    pub access_count: u32,
    pub url: Option<String>,
    pub title: Option<String>,
    pub previous_urls: Vec<PreviousUrl>,
    pub opener_tab_id: Option<TabId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activated_time: Option<f64>,
}

impl TabRecord {
    /// Fresh record for a tab that was just created
    pub fn opened(tab: &TabInfo, now: f64) -> TabRecord {
        TabRecord {
            first_opened: Some(now),
            last_accessed: Some(now),
            total_active_time: 0.0,
            access_count: 1,
            url: Some(tab.url.clone()),
            title: tab.title.clone(),
            previous_urls: Vec::new(),
            opener_tab_id: tab.opener_tab_id,
            last_activated_time: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.last_activated_time.is_some()
    }
}
