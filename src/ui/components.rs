/// Reusable UI components

use crate::preview::{Inline, ItemMarker, ListBlock, ListItem, ListKind, NestedKind, PreviewNode};
use std::rc::Rc;
use yew::prelude::*;

/// Pixels per indent level in the preview
const INDENT_PX: usize = 20;

#[derive(Properties, PartialEq)]
pub struct StatusToastProps {
    #[prop_or_default]
    pub message: Option<String>,
}

/// Transient status line; hidden while there is no message
#[function_component(StatusToast)]
pub fn status_toast(props: &StatusToastProps) -> Html {
    let class = if props.message.is_some() { "status show" } else { "status" };

    html! {
        <div class={class}>
            {props.message.clone().unwrap_or_default()}
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct MarkdownPreviewProps {
    pub nodes: Rc<Vec<PreviewNode>>,
    #[prop_or_default]
    pub node_ref: NodeRef,
    #[prop_or_default]
    pub onscroll: Callback<Event>,
}

/// Live preview of the rendered markdown
#[function_component(MarkdownPreview)]
pub fn markdown_preview(props: &MarkdownPreviewProps) -> Html {
    html! {
        <div id="preview" class="preview" ref={props.node_ref.clone()} onscroll={props.onscroll.clone()}>
            {for props.nodes.iter().map(render_node)}
        </div>
    }
}

fn render_node(node: &PreviewNode) -> Html {
    match node {
        PreviewNode::Heading { level, runs } => match level {
            1 => html! { <h1>{render_inline(runs)}</h1> },
            2 => html! { <h2>{render_inline(runs)}</h2> },
            _ => html! { <h3>{render_inline(runs)}</h3> },
        },
        PreviewNode::List(list) => render_list(list),
        PreviewNode::Paragraph(runs) => html! { <p>{render_inline(runs)}</p> },
        PreviewNode::Rule => html! { <hr /> },
        PreviewNode::LineBreak => html! { <br /> },
    }
}

fn render_list(list: &ListBlock) -> Html {
    let style = format!("margin-left: {}px;", list.indent * INDENT_PX);
    let items = list.items.iter().map(render_item).collect::<Html>();

    match list.kind {
        ListKind::Ordered => html! {
            <ol {style} start={list.start.map(|n| n.to_string())}>
                {items}
            </ol>
        },
        ListKind::Unordered => html! {
            <ul {style}>
                {items}
            </ul>
        },
    }
}

fn render_item(item: &ListItem) -> Html {
    match &item.marker {
        ItemMarker::Ordered(_) | ItemMarker::Bullet => html! {
            <li>{render_inline(&item.runs)}</li>
        },
        ItemMarker::Nested { offset, kind } => {
            let kind_class = match kind {
                NestedKind::ChildTab => "child-marker",
                NestedKind::PreviousUrl => "previous-url",
                NestedKind::Plain => "nested-text",
            };
            let style = format!("list-style: none; margin-left: {}px;", offset * INDENT_PX);

            html! {
                <li class={classes!("nested", kind_class)} {style}>
                    {render_inline(&item.runs)}
                </li>
            }
        }
    }
}

fn render_inline(runs: &[Inline]) -> Html {
    runs.iter()
        .map(|run| match run {
            Inline::Text(text) => html! { <>{text.clone()}</> },
            Inline::Strong(text) => html! { <strong>{text.clone()}</strong> },
            Inline::Link { text, href } => html! {
                <a href={href.clone()} target="_blank" rel="noopener noreferrer">{text.clone()}</a>
            },
        })
        .collect::<Html>()
}
