/// Tab lifecycle bookkeeping over the tab history store.
///
/// Every handler takes the store explicitly together with the event time,
/// so the handlers stay pure and the caller decides when to persist.

use crate::storage::TabHistory;
use crate::tab_data::{PreviousUrl, TabId, TabInfo, TabRecord};

/// A tab was created
pub fn tab_created(history: &mut TabHistory, tab: &TabInfo, now: f64) {
    history.insert(tab.id, TabRecord::opened(tab, now));
}

/// A tab became the foreground tab
pub fn tab_activated(history: &mut TabHistory, tab_id: TabId, now: f64) {
    let record = history.record_mut(tab_id);
    record.last_accessed = Some(now);
    record.access_count += 1;
    record.last_activated_time = Some(now);
}

/// A tab lost the foreground; folds the elapsed time into its total.
///
/// Returns false when the tab had no activation in progress.
pub fn tab_deactivated(history: &mut TabHistory, tab_id: TabId, now: f64) -> bool {
    let activated_at = match history.get(tab_id).and_then(|r| r.last_activated_time) {
        Some(t) => t,
        None => return false,
    };

    if let Some(record) = history.existing_mut(tab_id) {
        record.total_active_time += (now - activated_at).max(0.0);
        record.last_activated_time = None;
    }
    true
}

/// A tab navigated or changed its title
pub fn tab_updated(
    history: &mut TabHistory,
    tab_id: TabId,
    url: Option<&str>,
    title: Option<&str>,
    now: f64,
) {
    let Some(url) = url else {
        return;
    };

    let record = history.record_mut(tab_id);
    if let Some(old_url) = record.url.as_deref() {
        if !old_url.is_empty() && old_url != url {
            record.previous_urls.push(PreviousUrl {
                url: old_url.to_string(),
                timestamp: now,
            });
        }
    }

    record.url = Some(url.to_string());
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        record.title = Some(title.to_string());
    }
}

/// A tab was closed
pub fn tab_removed(history: &mut TabHistory, tab_id: TabId) {
    history.remove(tab_id);
}

/// Foreground switched to `tab_id`.
///
/// The previous tab is deactivated when the browser reports it; otherwise
/// every other tab with an activation in progress is.
pub fn tab_switched(history: &mut TabHistory, tab_id: TabId, previous: Option<TabId>, now: f64) {
    let outgoing = match previous {
        Some(prev) => vec![prev],
        None => history.active_ids(),
    };

    for id in outgoing.into_iter().filter(|id| *id != tab_id) {
        if tab_deactivated(history, id, now) {
            log::debug!("Tab {} deactivated", id);
        }
    }

    tab_activated(history, tab_id, now);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tab(id: TabId, url: &str) -> TabInfo {
        TabInfo::new(id, id, url.to_string(), format!("Tab {}", id))
    }

    fn history_with_tab(id: TabId) -> TabHistory {
        let mut history = TabHistory::new();
        tab_created(&mut history, &create_test_tab(id, "https://a.com"), 0.0);
        history
    }

    #[test]
    fn test_created_initializes_record() {
        let mut history = TabHistory::new();
        let mut tab = create_test_tab(5, "https://github.com");
        tab.opener_tab_id = Some(1);

        tab_created(&mut history, &tab, 100.0);

        let record = history.get(5).unwrap();
        assert_eq!(record.first_opened, Some(100.0));
        assert_eq!(record.access_count, 1);
        assert_eq!(record.url.as_deref(), Some("https://github.com"));
        assert_eq!(record.opener_tab_id, Some(1));
    }

    #[test]
    fn test_double_activation_counts_twice() {
        let mut history = history_with_tab(1);

        tab_activated(&mut history, 1, 1_000.0);
        tab_activated(&mut history, 1, 2_000.0);

        let record = history.get(1).unwrap();
        assert_eq!(record.access_count, 3);
        assert_eq!(record.total_active_time, 0.0);
        assert_eq!(record.last_activated_time, Some(2_000.0));
    }

    #[test]
    fn test_deactivation_accumulates_active_time() {
        let mut history = history_with_tab(1);
        history.existing_mut(1).unwrap().total_active_time = 500.0;

        tab_activated(&mut history, 1, 1_000.0);
        assert!(tab_deactivated(&mut history, 1, 4_000.0));

        let record = history.get(1).unwrap();
        assert_eq!(record.total_active_time, 3_500.0);
        assert_eq!(record.last_activated_time, None);
    }

    #[test]
    fn test_second_deactivation_is_noop() {
        let mut history = history_with_tab(1);
        tab_activated(&mut history, 1, 1_000.0);
        tab_deactivated(&mut history, 1, 2_000.0);

        assert!(!tab_deactivated(&mut history, 1, 9_000.0));
        assert_eq!(history.get(1).unwrap().total_active_time, 1_000.0);
    }

    #[test]
    fn test_deactivation_of_missing_tab() {
        let mut history = TabHistory::new();

        assert!(!tab_deactivated(&mut history, 42, 1.0));
        assert!(history.is_empty());
    }

    #[test]
    fn test_clock_going_backwards_never_subtracts() {
        let mut history = history_with_tab(1);
        tab_activated(&mut history, 1, 5_000.0);
        tab_deactivated(&mut history, 1, 4_000.0);

        assert_eq!(history.get(1).unwrap().total_active_time, 0.0);
    }

    #[test]
    fn test_activation_of_unknown_tab_creates_record() {
        let mut history = TabHistory::new();

        tab_activated(&mut history, 8, 10.0);

        let record = history.get(8).unwrap();
        assert_eq!(record.access_count, 1);
        assert_eq!(record.first_opened, None);
    }

    #[test]
    fn test_update_appends_previous_url() {
        let mut history = history_with_tab(1);

        tab_updated(&mut history, 1, Some("https://b.com"), Some("B"), 50.0);
        tab_updated(&mut history, 1, Some("https://c.com"), None, 60.0);

        let record = history.get(1).unwrap();
        assert_eq!(record.url.as_deref(), Some("https://c.com"));
        assert_eq!(record.title.as_deref(), Some("B"));
        assert_eq!(
            record.previous_urls,
            vec![
                PreviousUrl { url: "https://a.com".to_string(), timestamp: 50.0 },
                PreviousUrl { url: "https://b.com".to_string(), timestamp: 60.0 },
            ]
        );
    }

    #[test]
    fn test_update_same_url_keeps_history() {
        let mut history = history_with_tab(1);

        tab_updated(&mut history, 1, Some("https://a.com"), Some("Reloaded"), 50.0);

        let record = history.get(1).unwrap();
        assert!(record.previous_urls.is_empty());
        assert_eq!(record.title.as_deref(), Some("Reloaded"));
    }

    #[test]
    fn test_update_without_url_is_ignored() {
        let mut history = history_with_tab(1);
        history.take_dirty_json().unwrap();

        tab_updated(&mut history, 1, None, Some("Title only"), 50.0);

        assert_eq!(history.get(1).unwrap().title.as_deref(), Some("Tab 1"));
        assert!(!history.is_dirty());
    }

    #[test]
    fn test_update_of_unknown_tab() {
        let mut history = TabHistory::new();

        tab_updated(&mut history, 3, Some("https://x.com"), None, 1.0);

        let record = history.get(3).unwrap();
        assert_eq!(record.url.as_deref(), Some("https://x.com"));
        assert!(record.previous_urls.is_empty());
    }

    #[test]
    fn test_removed_deletes_record() {
        let mut history = history_with_tab(1);

        tab_removed(&mut history, 1);
        tab_removed(&mut history, 1);

        assert!(history.get(1).is_none());
    }

    #[test]
    fn test_switch_with_previous_tab() {
        let mut history = history_with_tab(1);
        tab_created(&mut history, &create_test_tab(2, "https://b.com"), 0.0);
        tab_activated(&mut history, 1, 1_000.0);

        tab_switched(&mut history, 2, Some(1), 3_000.0);

        assert_eq!(history.get(1).unwrap().total_active_time, 2_000.0);
        assert!(!history.get(1).unwrap().is_active());
        assert_eq!(history.get(2).unwrap().last_activated_time, Some(3_000.0));
        assert_eq!(history.get(2).unwrap().access_count, 2);
    }

    #[test]
    fn test_switch_without_previous_deactivates_others() {
        let mut history = history_with_tab(1);
        tab_created(&mut history, &create_test_tab(2, "https://b.com"), 0.0);
        tab_created(&mut history, &create_test_tab(3, "https://c.com"), 0.0);
        tab_activated(&mut history, 1, 100.0);
        tab_activated(&mut history, 2, 200.0);

        tab_switched(&mut history, 3, None, 1_000.0);

        assert_eq!(history.get(1).unwrap().total_active_time, 900.0);
        assert_eq!(history.get(2).unwrap().total_active_time, 800.0);
        assert_eq!(history.active_ids(), vec![3]);
    }

    #[test]
    fn test_switch_to_same_tab_keeps_activation() {
        let mut history = history_with_tab(1);
        tab_activated(&mut history, 1, 100.0);

        tab_switched(&mut history, 1, Some(1), 500.0);

        let record = history.get(1).unwrap();
        assert_eq!(record.total_active_time, 0.0);
        assert_eq!(record.last_activated_time, Some(500.0));
    }
}
