/// Line-oriented markdown renderer for the editor preview.
///
/// Understands exactly what the tab documents use: `#`-`###` headings,
/// ordered and bullet lists with two-space indentation, `---` rules,
/// `[text](url)` links and `**bold**`. Everything else is a paragraph, so
/// rendering never fails. The output is rebuilt from scratch on every call.

use regex::Regex;
use std::sync::OnceLock;

/// Glyph that introduces a child tab block
pub const CHILD_MARKER: char = '↳';

/// Glyph that introduces a previous URL entry
pub const PREVIOUS_URL_MARKER: char = '•';

/// Inline span of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
    /// Opens in a new browsing context
    Link { text: String, href: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// What a nested, marker-less list line stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestedKind {
    ChildTab,
    PreviousUrl,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemMarker {
    /// Number as written in the source, leading zeros included
    Ordered(String),
    Bullet,
    /// Indented continuation; `offset` is in indent levels past the list's own
    Nested { offset: usize, kind: NestedKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub marker: ItemMarker,
    pub runs: Vec<Inline>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListBlock {
    pub kind: ListKind,
    /// Explicit start number, only when the first item is numbered above 1
    pub start: Option<u64>,
    pub indent: usize,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewNode {
    Heading { level: u8, runs: Vec<Inline> },
    List(ListBlock),
    Paragraph(Vec<Inline>),
    Rule,
    LineBreak,
}

/// Render `text` into preview nodes
pub fn render(text: &str) -> Vec<PreviewNode> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut renderer = LineRenderer::default();
    for line in text.lines() {
        renderer.push_line(line);
    }
    renderer.finish()
}

#[derive(Default)]
struct LineRenderer {
    nodes: Vec<PreviewNode>,
    open: Option<ListBlock>,
}

impl LineRenderer {
    fn push_line(&mut self, line: &str) {
        let indent = line.chars().take_while(|c| *c == ' ').count() / 2;
        let content = line.trim_start();

        if content.is_empty() {
            self.flush();
            self.nodes.push(PreviewNode::LineBreak);
            return;
        }

        if let Some((level, rest)) = heading(content) {
            self.flush();
            self.nodes.push(PreviewNode::Heading {
                level,
                runs: parse_inline(rest),
            });
            return;
        }

        if let Some((number, rest)) = ordered_item(content) {
            let start = number
                .parse::<u64>()
                .ok()
                .filter(|n| *n > 1);
            self.open_list(ListKind::Ordered, indent, start);
            self.push_item(ItemMarker::Ordered(number.to_string()), rest);
            return;
        }

        if let Some(rest) = content.strip_prefix("- ") {
            self.open_list(ListKind::Unordered, indent, None);
            self.push_item(ItemMarker::Bullet, rest);
            return;
        }

        if let Some(list_indent) = self.open.as_ref().map(|list| list.indent) {
            if indent > 0 {
                let kind = if content.starts_with(CHILD_MARKER) {
                    NestedKind::ChildTab
                } else if content.starts_with(PREVIOUS_URL_MARKER) {
                    NestedKind::PreviousUrl
                } else {
                    NestedKind::Plain
                };
                let offset = indent.saturating_sub(list_indent);
                self.push_item(ItemMarker::Nested { offset, kind }, content);
                return;
            }
        }

        if let Some(rest) = content.strip_prefix("• ") {
            self.open_list(ListKind::Unordered, indent, None);
            self.push_item(ItemMarker::Bullet, rest);
            return;
        }

        self.flush();
        if content.trim_end() == "---" {
            self.nodes.push(PreviewNode::Rule);
        } else {
            self.nodes.push(PreviewNode::Paragraph(parse_inline(content)));
        }
    }

    /// Keep the open list if it matches, otherwise start a new one
    fn open_list(&mut self, kind: ListKind, indent: usize, start: Option<u64>) {
        let matches = self
            .open
            .as_ref()
            .is_some_and(|list| list.kind == kind && list.indent == indent);
        if matches {
            return;
        }

        self.flush();
        self.open = Some(ListBlock {
            kind,
            start,
            indent,
            items: Vec::new(),
        });
    }

    fn push_item(&mut self, marker: ItemMarker, text: &str) {
        if let Some(list) = self.open.as_mut() {
            list.items.push(ListItem {
                marker,
                runs: parse_inline(text),
            });
        }
    }

    fn flush(&mut self) {
        if let Some(list) = self.open.take() {
            self.nodes.push(PreviewNode::List(list));
        }
    }

    fn finish(mut self) -> Vec<PreviewNode> {
        self.flush();
        self.nodes
    }
}

/// `# `, `## ` or `### ` prefix
fn heading(content: &str) -> Option<(u8, &str)> {
    let hashes = content.chars().take_while(|c| *c == '#').count();
    if !(1..=3).contains(&hashes) {
        return None;
    }
    content[hashes..].strip_prefix(' ').map(|rest| (hashes as u8, rest))
}

/// `<digits>. ` prefix, returning the digits and the item text
fn ordered_item(content: &str) -> Option<(&str, &str)> {
    let digits = content.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    content[digits..]
        .strip_prefix(". ")
        .map(|rest| (&content[..digits], rest))
}

fn inline_pattern() -> &'static Regex {
    static INLINE: OnceLock<Regex> = OnceLock::new();
    INLINE.get_or_init(|| {
        Regex::new(r"\[([^\]]+)\]\(([^)]+)\)|\*\*([^*]+)\*\*").expect("inline pattern is valid")
    })
}

/// Split a fragment into plain, link and bold runs
pub fn parse_inline(text: &str) -> Vec<Inline> {
    let mut runs = Vec::new();
    let mut last = 0;

    for caps in inline_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            runs.push(Inline::Text(text[last..whole.start()].to_string()));
        }

        match (caps.get(1), caps.get(2), caps.get(3)) {
            (Some(label), Some(href), _) => runs.push(Inline::Link {
                text: label.as_str().to_string(),
                href: href.as_str().to_string(),
            }),
            (_, _, Some(bold)) => runs.push(Inline::Strong(bold.as_str().to_string())),
            _ => runs.push(Inline::Text(whole.as_str().to_string())),
        }
        last = whole.end();
    }

    if last < text.len() {
        runs.push(Inline::Text(text[last..].to_string()));
    }
    runs
}
