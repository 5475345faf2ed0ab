/// Editor page state that does not touch the DOM

use url::Url;

/// localStorage key of the unsaved draft
pub const DRAFT_KEY: &str = "tabsaver-draft";

/// Filename used when none is given
pub const DEFAULT_FILENAME: &str = "tabs.md";

/// Quiet period before the preview re-renders
pub const PREVIEW_DEBOUNCE_MS: u64 = 300;

/// Quiet period before the draft is written to localStorage
pub const DRAFT_DEBOUNCE_MS: u64 = 1_000;

/// How long a status message stays visible
pub const STATUS_VISIBLE_MS: u64 = 3_000;

/// How long a scroll leader holds before the other pane may lead again
pub const SCROLL_RELEASE_MS: u64 = 50;

/// Document and filename the editor opens with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorLaunch {
    pub content: Option<String>,
    pub filename: String,
}

impl EditorLaunch {
    /// Read the `content` and `filename` query parameters of the page URL
    pub fn from_url(href: &str) -> EditorLaunch {
        let mut launch = EditorLaunch {
            content: None,
            filename: DEFAULT_FILENAME.to_string(),
        };

        let url = match Url::parse(href) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Unreadable editor URL {}: {}", href, e);
                return launch;
            }
        };

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "content" if !value.is_empty() => launch.content = Some(value.into_owned()),
                "filename" if !value.is_empty() => launch.filename = value.into_owned(),
                _ => {}
            }
        }

        launch
    }

    /// Initial text: the passed content, else the cached draft
    pub fn initial_text(&self, draft: Option<String>) -> String {
        self.content.clone().or(draft).unwrap_or_default()
    }
}

/// URL of the editor page carrying a document
pub fn editor_url(base: &str, content: &str, filename: &str) -> Result<String, String> {
    let mut url = Url::parse(base).map_err(|e| format!("Invalid editor URL {}: {}", base, e))?;
    url.query_pairs_mut()
        .append_pair("content", content)
        .append_pair("filename", filename);
    Ok(url.into())
}

/// Filename from the input field, falling back to the default
pub fn effective_filename(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Last-input-wins debouncing.
///
/// Each input takes a new generation; a timer that wakes up with a stale
/// generation does nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    generation: u64,
}

impl Debouncer {
    pub fn schedule(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

/// The two scrollable panes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Editor,
    Preview,
}

impl Pane {
    pub fn other(self) -> Pane {
        match self {
            Pane::Editor => Pane::Preview,
            Pane::Preview => Pane::Editor,
        }
    }
}

/// Which pane currently drives scrolling.
///
/// A scroll event from the non-leading pane while a leader holds is the
/// echo of a programmatic scroll and is ignored.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSync {
    leader: Option<Pane>,
    token: u64,
}

impl ScrollSync {
    /// Token to release with, or None when the event is an echo
    pub fn begin(&mut self, origin: Pane) -> Option<u64> {
        if self.leader == Some(origin.other()) {
            return None;
        }
        self.leader = Some(origin);
        self.token += 1;
        Some(self.token)
    }

    /// Drop leadership unless a newer scroll renewed it
    pub fn release(&mut self, token: u64) {
        if self.token == token {
            self.leader = None;
        }
    }

    pub fn leader(&self) -> Option<Pane> {
        self.leader
    }
}

/// Scroll offset in the target pane matching the source's relative position
pub fn mirrored_scroll_top(
    source_top: f64,
    source_scroll_height: f64,
    source_client_height: f64,
    target_scroll_height: f64,
    target_client_height: f64,
) -> f64 {
    let source_range = source_scroll_height - source_client_height;
    if source_range <= 0.0 {
        return 0.0;
    }
    let ratio = (source_top / source_range).clamp(0.0, 1.0);
    ratio * (target_scroll_height - target_client_height).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_from_url() {
        let launch = EditorLaunch::from_url(
            "moz-extension://abc/editor.html?content=%23%20Saved%0A1.%20x&filename=tabs_2024-01-02_03-04.md",
        );

        assert_eq!(launch.content.as_deref(), Some("# Saved\n1. x"));
        assert_eq!(launch.filename, "tabs_2024-01-02_03-04.md");
    }

    #[test]
    fn test_launch_defaults() {
        let launch = EditorLaunch::from_url("moz-extension://abc/editor.html");

        assert_eq!(launch.content, None);
        assert_eq!(launch.filename, DEFAULT_FILENAME);
        assert_eq!(launch.initial_text(Some("draft".to_string())), "draft");
        assert_eq!(launch.initial_text(None), "");
    }

    #[test]
    fn test_content_wins_over_draft() {
        let launch = EditorLaunch::from_url("moz-extension://abc/editor.html?content=fresh");

        assert_eq!(launch.initial_text(Some("draft".to_string())), "fresh");
    }

    #[test]
    fn test_unparseable_url_uses_defaults() {
        let launch = EditorLaunch::from_url("not a url");

        assert_eq!(launch.content, None);
        assert_eq!(launch.filename, DEFAULT_FILENAME);
    }

    #[test]
    fn test_editor_url_round_trip() {
        let content = "# Tabs & more\n1. [A](https://a.com/?q=1&r=2)";
        let url = editor_url("moz-extension://abc/editor.html", content, "tabs.md").unwrap();
        let launch = EditorLaunch::from_url(&url);

        assert_eq!(launch.content.as_deref(), Some(content));
        assert_eq!(launch.filename, "tabs.md");
    }

    #[test]
    fn test_effective_filename() {
        assert_eq!(effective_filename("  "), DEFAULT_FILENAME);
        assert_eq!(effective_filename(" notes.md "), "notes.md");
    }

    #[test]
    fn test_debouncer_last_input_wins() {
        let mut debouncer = Debouncer::default();
        let first = debouncer.schedule();
        let second = debouncer.schedule();

        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));
    }

    #[test]
    fn test_scroll_echo_is_suppressed() {
        let mut sync = ScrollSync::default();

        let token = sync.begin(Pane::Editor).unwrap();
        assert_eq!(sync.begin(Pane::Preview), None);
        assert_eq!(sync.leader(), Some(Pane::Editor));

        sync.release(token);
        assert_eq!(sync.leader(), None);
        assert!(sync.begin(Pane::Preview).is_some());
    }

    #[test]
    fn test_scroll_release_with_stale_token() {
        let mut sync = ScrollSync::default();

        let first = sync.begin(Pane::Editor).unwrap();
        let second = sync.begin(Pane::Editor).unwrap();
        sync.release(first);

        assert_eq!(sync.leader(), Some(Pane::Editor));
        sync.release(second);
        assert_eq!(sync.leader(), None);
    }

    #[test]
    fn test_mirrored_scroll_top() {
        assert_eq!(mirrored_scroll_top(50.0, 200.0, 100.0, 500.0, 100.0), 200.0);
        assert_eq!(mirrored_scroll_top(10.0, 100.0, 100.0, 500.0, 100.0), 0.0);
        assert_eq!(mirrored_scroll_top(500.0, 200.0, 100.0, 300.0, 100.0), 200.0);
    }
}
