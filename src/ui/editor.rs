/// Editor page: markdown text area with live preview

use crate::editor_state::{
    effective_filename, mirrored_scroll_top, Debouncer, EditorLaunch, Pane, ScrollSync, DRAFT_DEBOUNCE_MS,
    DRAFT_KEY, PREVIEW_DEBOUNCE_MS, SCROLL_RELEASE_MS, STATUS_VISIBLE_MS,
};
use crate::preview::{render, PreviewNode};
use crate::ui::components::{MarkdownPreview, StatusToast};
use patternfly_yew::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};
use yew::platform::time::sleep;
use yew::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/editor.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn downloadText(text: &str, filename: &str, save_as: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn writeClipboard(text: &str) -> Result<(), JsValue>;

    fn copyWithSelection(text: &str) -> bool;
}

type Shared<T> = Rc<RefCell<T>>;

#[function_component(Editor)]
pub fn editor() -> Html {
    let text = use_mut_ref(String::new);
    let nodes = use_state(|| Rc::new(Vec::<PreviewNode>::new()));
    let preview_visible = use_state(|| true);
    let status = use_state(|| None::<String>);

    let preview_debounce = use_mut_ref(Debouncer::default);
    let draft_debounce = use_mut_ref(Debouncer::default);
    let status_debounce = use_mut_ref(Debouncer::default);
    let scroll = use_mut_ref(ScrollSync::default);

    let editor_ref = use_node_ref();
    let preview_ref = use_node_ref();
    let filename_ref = use_node_ref();

    // Load launch parameters or the cached draft on mount
    {
        let text = text.clone();
        let nodes = nodes.clone();
        let editor_ref = editor_ref.clone();
        let filename_ref = filename_ref.clone();

        use_effect_with((), move |_| {
            let href = web_sys::window()
                .and_then(|w| w.location().href().ok())
                .unwrap_or_default();
            let launch = EditorLaunch::from_url(&href);
            let initial = launch.initial_text(load_draft());

            if let Some(area) = editor_ref.cast::<HtmlTextAreaElement>() {
                area.set_value(&initial);
            }
            if let Some(input) = filename_ref.cast::<HtmlInputElement>() {
                input.set_value(&launch.filename);
                let _ = input.focus();
                input.select();
            }

            nodes.set(Rc::new(render(&initial)));
            *text.borrow_mut() = initial;
            || ()
        });
    }

    let on_input = {
        let text = text.clone();
        let nodes = nodes.clone();
        let status = status.clone();
        let preview_debounce = preview_debounce.clone();
        let draft_debounce = draft_debounce.clone();
        let status_debounce = status_debounce.clone();

        Callback::from(move |e: InputEvent| {
            let Some(area) = e.target_dyn_into::<HtmlTextAreaElement>() else {
                return;
            };
            let value = area.value();
            *text.borrow_mut() = value.clone();

            let generation = preview_debounce.borrow_mut().schedule();
            {
                let nodes = nodes.clone();
                let preview_debounce = preview_debounce.clone();
                let value = value.clone();
                spawn_local(async move {
                    sleep(Duration::from_millis(PREVIEW_DEBOUNCE_MS)).await;
                    if preview_debounce.borrow().is_current(generation) {
                        nodes.set(Rc::new(render(&value)));
                    }
                });
            }

            let generation = draft_debounce.borrow_mut().schedule();
            {
                let draft_debounce = draft_debounce.clone();
                let status = status.clone();
                let status_debounce = status_debounce.clone();
                spawn_local(async move {
                    sleep(Duration::from_millis(DRAFT_DEBOUNCE_MS)).await;
                    if draft_debounce.borrow().is_current(generation) {
                        match save_draft(&value) {
                            Ok(()) => show_status(&status, &status_debounce, "Draft saved locally"),
                            Err(e) => log::warn!("{}", e),
                        }
                    }
                });
            }
        })
    };

    let on_save = {
        let text = text.clone();
        let filename_ref = filename_ref.clone();
        let status = status.clone();
        let status_debounce = status_debounce.clone();

        Callback::from(move |_: ()| {
            let content = text.borrow().clone();
            let filename = read_filename(&filename_ref);
            let status = status.clone();
            let status_debounce = status_debounce.clone();

            spawn_local(async move {
                match downloadText(&content, &filename, false).await {
                    Ok(()) => show_status(&status, &status_debounce, "Saved to Downloads folder!"),
                    Err(e) => log::error!("Save failed: {:?}", e),
                }
            });
        })
    };

    let on_download = {
        let text = text.clone();
        let filename_ref = filename_ref.clone();

        Callback::from(move |_: ()| {
            let content = text.borrow().clone();
            let filename = read_filename(&filename_ref);

            spawn_local(async move {
                if let Err(e) = downloadText(&content, &filename, true).await {
                    log::error!("Download failed: {:?}", e);
                }
            });
        })
    };

    let on_copy = {
        let text = text.clone();
        let status = status.clone();
        let status_debounce = status_debounce.clone();

        Callback::from(move |_: MouseEvent| {
            let content = text.borrow().clone();
            let status = status.clone();
            let status_debounce = status_debounce.clone();

            spawn_local(async move {
                let copied = match writeClipboard(&content).await {
                    Ok(()) => true,
                    Err(e) => {
                        log::warn!("Clipboard API refused, using selection copy: {:?}", e);
                        copyWithSelection(&content)
                    }
                };

                if copied {
                    show_status(&status, &status_debounce, "Copied to clipboard!");
                } else {
                    log::error!("Copy to clipboard failed");
                }
            });
        })
    };

    let on_toggle_preview = {
        let preview_visible = preview_visible.clone();
        Callback::from(move |_: MouseEvent| {
            preview_visible.set(!*preview_visible);
        })
    };

    // Ctrl/Cmd+S saves, Ctrl/Cmd+Enter opens the save dialog
    let on_keydown = {
        let on_save = on_save.clone();
        let on_download = on_download.clone();

        Callback::from(move |e: KeyboardEvent| {
            if !(e.ctrl_key() || e.meta_key()) {
                return;
            }
            match e.key().as_str() {
                "s" => {
                    e.prevent_default();
                    on_save.emit(());
                }
                "Enter" => {
                    e.prevent_default();
                    on_download.emit(());
                }
                _ => {}
            }
        })
    };

    let on_filename_keydown = {
        let on_save = on_save.clone();
        Callback::from(move |e: KeyboardEvent| {
            if e.key() == "Enter" && !(e.ctrl_key() || e.meta_key()) {
                e.prevent_default();
                on_save.emit(());
            }
        })
    };

    let on_editor_scroll = scroll_handler(Pane::Editor, &scroll, &editor_ref, &preview_ref);
    let on_preview_scroll = scroll_handler(Pane::Preview, &scroll, &preview_ref, &editor_ref);

    html! {
        <div class="editor-page" onkeydown={on_keydown}>
            <div class="toolbar">
                <input
                    id="filenameInput"
                    type="text"
                    class="filename-input"
                    ref={filename_ref}
                    onkeydown={on_filename_keydown}
                />
                <Button onclick={on_save.reform(|_| ())} variant={ButtonVariant::Primary}>
                    {"💾 Save"}
                </Button>
                <Button onclick={on_download.reform(|_| ())} variant={ButtonVariant::Secondary}>
                    {"📥 Download as..."}
                </Button>
                <Button onclick={on_copy} variant={ButtonVariant::Secondary}>
                    {"📋 Copy"}
                </Button>
                <Button onclick={on_toggle_preview} variant={ButtonVariant::Secondary}>
                    {if *preview_visible { "Hide preview" } else { "Show preview" }}
                </Button>
            </div>

            <div class="editor-panes">
                <textarea
                    id="editor"
                    class="editor-input"
                    ref={editor_ref}
                    oninput={on_input}
                    onscroll={on_editor_scroll}
                    spellcheck="false"
                />
                if *preview_visible {
                    <div id="previewContainer" class="preview-container">
                        <MarkdownPreview
                            nodes={(*nodes).clone()}
                            node_ref={preview_ref}
                            onscroll={on_preview_scroll}
                        />
                    </div>
                }
            </div>

            <StatusToast message={(*status).clone()} />
        </div>
    }
}

/// Mirror scrolling from `origin` onto the other pane, ignoring echoes
fn scroll_handler(origin: Pane, scroll: &Shared<ScrollSync>, source: &NodeRef, target: &NodeRef) -> Callback<Event> {
    let scroll = scroll.clone();
    let source = source.clone();
    let target = target.clone();

    Callback::from(move |_: Event| {
        let Some(token) = scroll.borrow_mut().begin(origin) else {
            return;
        };

        if let (Some(src), Some(dst)) = (source.cast::<Element>(), target.cast::<Element>()) {
            let top = mirrored_scroll_top(
                f64::from(src.scroll_top()),
                f64::from(src.scroll_height()),
                f64::from(src.client_height()),
                f64::from(dst.scroll_height()),
                f64::from(dst.client_height()),
            );
            dst.set_scroll_top(top.round() as i32);
        }

        let scroll = scroll.clone();
        spawn_local(async move {
            sleep(Duration::from_millis(SCROLL_RELEASE_MS)).await;
            scroll.borrow_mut().release(token);
        });
    })
}

/// Show `message`, clearing it after a while unless replaced
fn show_status(status: &UseStateHandle<Option<String>>, debounce: &Shared<Debouncer>, message: &str) {
    status.set(Some(message.to_string()));

    let generation = debounce.borrow_mut().schedule();
    let status = status.clone();
    let debounce = debounce.clone();
    spawn_local(async move {
        sleep(Duration::from_millis(STATUS_VISIBLE_MS)).await;
        if debounce.borrow().is_current(generation) {
            status.set(None);
        }
    });
}

// Helper functions

fn read_filename(filename_ref: &NodeRef) -> String {
    let value = filename_ref
        .cast::<HtmlInputElement>()
        .map(|input| input.value())
        .unwrap_or_default();
    effective_filename(&value)
}

fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .ok_or_else(|| "No window".to_string())?
        .local_storage()
        .map_err(|e| format!("Failed to open localStorage: {:?}", e))?
        .ok_or_else(|| "localStorage unavailable".to_string())
}

fn load_draft() -> Option<String> {
    match local_storage().and_then(|storage| {
        storage
            .get_item(DRAFT_KEY)
            .map_err(|e| format!("Failed to read draft: {:?}", e))
    }) {
        Ok(draft) => draft.filter(|d| !d.is_empty()),
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}

fn save_draft(text: &str) -> Result<(), String> {
    local_storage()?
        .set_item(DRAFT_KEY, text)
        .map_err(|e| format!("Failed to save draft: {:?}", e))
}
