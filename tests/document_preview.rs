//! Tab events through to the rendered preview of the saved document

use tab_saver::markdown::{build_markdown, TimeFormat};
use tab_saver::preview::{render, Inline, ItemMarker, ListKind, NestedKind, PreviewNode};
use tab_saver::storage::TabHistory;
use tab_saver::tab_data::TabInfo;
use tab_saver::tracker;

struct Clock;

impl TimeFormat for Clock {
    fn date_time(&self, timestamp: f64) -> String {
        format!("t{}", timestamp)
    }

    fn time(&self, timestamp: f64) -> String {
        format!("{}ms", timestamp)
    }
}

fn window() -> (Vec<TabInfo>, TabHistory) {
    let mut parent = TabInfo::new(1, 0, "https://news.example".to_string(), "News".to_string());
    parent.active = true;
    let mut child = TabInfo::new(2, 1, "https://story.example".to_string(), "Story".to_string());
    child.opener_tab_id = Some(1);

    let mut history = TabHistory::new();
    tracker::tab_created(&mut history, &parent, 0.0);
    tracker::tab_created(&mut history, &child, 10.0);
    tracker::tab_switched(&mut history, 1, None, 100.0);
    tracker::tab_updated(&mut history, 1, Some("https://news.example/today"), Some("News"), 200.0);
    tracker::tab_switched(&mut history, 2, Some(1), 60_100.0);

    parent.url = "https://news.example/today".to_string();
    (vec![parent, child], history)
}

#[test]
fn test_saved_document_previews_as_structure() {
    let (tabs, history) = window();
    let markdown = build_markdown(&tabs, &history, &Clock, 1_000.0);
    let nodes = render(&markdown);

    assert_eq!(
        nodes[0],
        PreviewNode::Heading {
            level: 1,
            runs: vec![Inline::Text("Saved Tabs - t1000".to_string())],
        }
    );
    assert_eq!(
        nodes[2],
        PreviewNode::Paragraph(vec![
            Inline::Strong("Total tabs:".to_string()),
            Inline::Text(" 2".to_string()),
        ])
    );
    assert!(nodes.contains(&PreviewNode::Rule));

    let lists: Vec<_> = nodes
        .iter()
        .filter_map(|node| match node {
            PreviewNode::List(list) => Some(list),
            _ => None,
        })
        .collect();

    let first = lists[0];
    assert_eq!(first.kind, ListKind::Ordered);
    assert_eq!(
        first.items[0].runs[0],
        Inline::Link {
            text: "News".to_string(),
            href: "https://news.example/today".to_string(),
        }
    );

    let details = lists[1];
    assert_eq!(details.indent, 1);
    assert!(details.items.iter().any(|item| matches!(
        item.marker,
        ItemMarker::Nested { kind: NestedKind::PreviousUrl, .. }
    )));
    assert!(details.items.iter().any(|item| matches!(
        item.marker,
        ItemMarker::Nested { kind: NestedKind::ChildTab, .. }
    )));

    let child = lists[2];
    assert_eq!(child.kind, ListKind::Ordered);
    assert_eq!(child.indent, 1);
    assert_eq!(child.start, Some(2));
}

#[test]
fn test_saved_document_reports_usage() {
    let (tabs, history) = window();
    let markdown = build_markdown(&tabs, &history, &Clock, 1_000.0);

    assert!(markdown.contains("1. [News](https://news.example/today) [ACTIVE]"));
    assert!(markdown.contains("   - Times accessed: 2"));
    assert!(markdown.contains("   - Total active time: 1m 0s"));
    assert!(markdown.contains("     • https://news.example (200ms)"));
    assert!(markdown.contains("   ↳ Child tab:\n  2. [Story](https://story.example)"));
    assert!(markdown.contains("- Total access count: 4"));
    assert_eq!(markdown.matches("[Story]").count(), 1);
}
