/// Markdown document generation for the current window's tabs

use crate::storage::TabHistory;
use crate::tab_data::{TabId, TabInfo, TabRecord};
use std::collections::{HashMap, HashSet};
use wasm_bindgen::JsValue;

/// Number of previous URLs listed per tab
const PREVIOUS_URL_LIMIT: usize = 3;

/// Renders timestamps (epoch milliseconds) for the document
pub trait TimeFormat {
    fn date_time(&self, timestamp: f64) -> String;
    fn time(&self, timestamp: f64) -> String;
}

/// Browser locale formatting through `Date`
pub struct LocalTime;

impl TimeFormat for LocalTime {
    fn date_time(&self, timestamp: f64) -> String {
        let date = js_sys::Date::new(&JsValue::from_f64(timestamp));
        format!(
            "{} {}",
            String::from(date.to_locale_date_string("default", &JsValue::UNDEFINED)),
            String::from(date.to_locale_time_string("default"))
        )
    }

    fn time(&self, timestamp: f64) -> String {
        let date = js_sys::Date::new(&JsValue::from_f64(timestamp));
        date.to_locale_time_string("default").into()
    }
}

/// `tabs_<year>-<MM>-<DD>_<hh>-<mm>.md`
pub fn export_filename(year: u32, month: u32, day: u32, hour: u32, minute: u32) -> String {
    format!(
        "tabs_{}-{:02}-{:02}_{:02}-{:02}.md",
        year, month, day, hour, minute
    )
}

/// Export filename for a local timestamp
pub fn export_filename_at(timestamp: f64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(timestamp));
    export_filename(
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes(),
    )
}

/// `<m>m <s>s`
pub fn format_duration(ms: f64) -> String {
    let ms = ms.max(0.0) as u64;
    format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1_000)
}

/// One tab in render order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeEntry {
    /// Position in the input tab list
    pub position: usize,
    /// Nesting depth, 0 for top-level tabs
    pub level: usize,
}

/// Opener relationships among the listed tabs
#[derive(Debug, Default)]
pub struct TabTree {
    roots: Vec<usize>,
    children: HashMap<TabId, Vec<usize>>,
}

impl TabTree {
    /// Group tabs under their opener when the opener is also listed
    pub fn build(tabs: &[TabInfo], history: &TabHistory) -> TabTree {
        let listed: HashSet<TabId> = tabs.iter().map(|t| t.id).collect();
        let mut tree = TabTree::default();

        for (position, tab) in tabs.iter().enumerate() {
            let parent = history
                .get(tab.id)
                .and_then(|record| record.opener_tab_id)
                .filter(|parent| *parent != tab.id && listed.contains(parent));

            match parent {
                Some(parent) => tree.children.entry(parent).or_default().push(position),
                None => tree.roots.push(position),
            }
        }

        tree
    }

    /// Depth-first order, each tab exactly once.
    ///
    /// Tabs unreachable from a root (opener cycles) start their own
    /// top-level group in list order.
    pub fn flatten(&self, tabs: &[TabInfo]) -> Vec<TreeEntry> {
        let mut visited = vec![false; tabs.len()];
        let mut order = Vec::with_capacity(tabs.len());

        let starts = self
            .roots
            .iter()
            .copied()
            .chain(0..tabs.len());

        for start in starts {
            if visited[start] {
                continue;
            }

            let mut stack = vec![TreeEntry { position: start, level: 0 }];
            while let Some(entry) = stack.pop() {
                if visited[entry.position] {
                    continue;
                }
                visited[entry.position] = true;
                order.push(entry);

                if let Some(children) = self.children.get(&tabs[entry.position].id) {
                    stack.extend(children.iter().rev().map(|&position| TreeEntry {
                        position,
                        level: entry.level + 1,
                    }));
                }
            }
        }

        order
    }
}

/// Builds the markdown snapshot of a window
pub struct DocumentBuilder<'a, T: TimeFormat> {
    tabs: &'a [TabInfo],
    history: &'a TabHistory,
    time: &'a T,
    lines: Vec<String>,
}

impl<'a, T: TimeFormat> DocumentBuilder<'a, T> {
    pub fn new(tabs: &'a [TabInfo], history: &'a TabHistory, time: &'a T) -> Self {
        DocumentBuilder {
            tabs,
            history,
            time,
            lines: Vec::new(),
        }
    }

    pub fn build(mut self, generated_at: f64) -> String {
        self.push_header(generated_at);

        let tabs = self.tabs;
        let entries = TabTree::build(tabs, self.history).flatten(tabs);
        for (i, entry) in entries.iter().enumerate() {
            if entry.level == 0 && i > 0 {
                self.lines.push(String::new());
            }
            if entry.level > 0 {
                let parent_indent = "  ".repeat(entry.level - 1);
                self.lines.push(format!("{}   ↳ Child tab:", parent_indent));
            }
            self.push_entry(&tabs[entry.position], entry.level);
        }
        if !entries.is_empty() {
            self.lines.push(String::new());
        }

        self.push_statistics();
        self.lines.join("\n")
    }

    fn record(&self, tab_id: TabId) -> Option<&'a TabRecord> {
        self.history.get(tab_id)
    }

    fn push_header(&mut self, generated_at: f64) {
        self.lines.push(format!("# Saved Tabs - {}", self.time.date_time(generated_at)));
        self.lines.push(String::new());
        self.lines.push(format!("**Total tabs:** {}", self.tabs.len()));
        self.lines.push("**Window:** Current window".to_string());
        self.lines.push(String::new());
        self.lines.push("---".to_string());
        self.lines.push(String::new());
    }

    fn push_entry(&mut self, tab: &TabInfo, level: usize) {
        let indent = "  ".repeat(level);
        let title = tab.title.as_deref().filter(|t| !t.is_empty()).unwrap_or("Untitled");

        let mut status = Vec::new();
        if tab.active {
            status.push("ACTIVE");
        }
        if tab.pinned {
            status.push("PINNED");
        }
        if tab.audible {
            status.push("🔊");
        }
        if tab.is_muted() {
            status.push("🔇");
        }
        let status = if status.is_empty() {
            String::new()
        } else {
            format!(" [{}]", status.join(", "))
        };

        self.lines.push(format!(
            "{}{}. [{}]({}){}",
            indent,
            tab.index + 1,
            title,
            tab.url,
            status
        ));

        if let Some(record) = self.record(tab.id) {
            if let Some(first_opened) = record.first_opened {
                self.lines.push(format!(
                    "{}   - First opened: {}",
                    indent,
                    self.time.date_time(first_opened)
                ));
            }
            if record.access_count > 0 {
                self.lines.push(format!("{}   - Times accessed: {}", indent, record.access_count));
            }
            if record.total_active_time > 0.0 {
                self.lines.push(format!(
                    "{}   - Total active time: {}",
                    indent,
                    format_duration(record.total_active_time)
                ));
            }
            if !record.previous_urls.is_empty() {
                let count = record.previous_urls.len();
                self.lines.push(format!("{}   - URL history: {} previous URLs", indent, count));
                for previous in &record.previous_urls[count.saturating_sub(PREVIOUS_URL_LIMIT)..] {
                    self.lines.push(format!(
                        "{}     • {} ({})",
                        indent,
                        previous.url,
                        self.time.time(previous.timestamp)
                    ));
                }
            }
        }

        if let Some(container) = tab.container() {
            self.lines.push(format!("{}   - Container: {}", indent, container));
        }

        self.lines.push(format!("{}   - Notes: ", indent));
    }

    fn push_statistics(&mut self) {
        let tabs = self.tabs;
        self.lines.push("---".to_string());
        self.lines.push(String::new());
        self.lines.push("## Statistics".to_string());
        self.lines.push(format!("- Total tabs: {}", tabs.len()));
        self.lines.push(format!("- Pinned tabs: {}", tabs.iter().filter(|t| t.pinned).count()));
        self.lines.push(format!("- Tabs with audio: {}", tabs.iter().filter(|t| t.audible).count()));
        match tabs.iter().position(|t| t.active) {
            Some(position) => self.lines.push(format!("- Active tab: Tab {}", position + 1)),
            None => self.lines.push("- Active tab: none".to_string()),
        }

        let records: Vec<&TabRecord> = tabs.iter().filter_map(|t| self.record(t.id)).collect();
        let total_active_time: f64 = records.iter().map(|r| r.total_active_time).sum();
        let total_access_count: u64 = records.iter().map(|r| u64::from(r.access_count)).sum();
        let with_history = records.iter().filter(|r| !r.previous_urls.is_empty()).count();

        if total_active_time > 0.0 {
            self.lines.push(format!("- Total active time: {}", format_duration(total_active_time)));
        }
        if total_access_count > 0 {
            self.lines.push(format!("- Total access count: {}", total_access_count));
        }
        if with_history > 0 {
            self.lines.push(format!("- Tabs with navigation history: {}", with_history));
        }
    }
}

/// Markdown snapshot of `tabs` in window order
pub fn build_markdown(
    tabs: &[TabInfo],
    history: &TabHistory,
    time: &impl TimeFormat,
    generated_at: f64,
) -> String {
    DocumentBuilder::new(tabs, history, time).build(generated_at)
}
