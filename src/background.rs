/// Background page: owns the tab history for the extension's lifetime

use crate::editor_state::editor_url;
use crate::markdown::{build_markdown, export_filename_at, LocalTime};
use crate::storage::{SaveMethod, TabHistory, HISTORY_KEY, SAVE_METHOD_KEY};
use crate::tab_data::{TabId, TabInfo};
use crate::tracker;
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

// Import JS bridge functions
#[wasm_bindgen(module = "/background.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getCurrentWindowTabs() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn downloadText(text: &str, filename: &str, save_as: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn copyInActiveTab(text: &str) -> Result<(), JsValue>;

    fn editorPageUrl() -> String;

    fn addTabListeners(
        on_created: &js_sys::Function,
        on_activated: &js_sys::Function,
        on_updated: &js_sys::Function,
        on_removed: &js_sys::Function,
    );

    fn addSaveListener(on_save: &js_sys::Function);
}

type SharedHistory = Rc<RefCell<TabHistory>>;

/// Payload of `tabs.onActivated`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActiveInfo {
    tab_id: TabId,
    #[serde(default)]
    previous_tab_id: Option<TabId>,
}

/// The part of `tabs.onUpdated`'s change info we track
#[derive(Debug, Default, Deserialize)]
struct ChangeInfo {
    #[serde(default)]
    url: Option<String>,
}

/// Load the history, then start listening for tab events
pub async fn run() {
    let history: SharedHistory = Rc::new(RefCell::new(load_history().await));
    flush(&history);

    register_tab_listeners(&history);
    register_save_listener(&history);

    log::info!("Tab tracking started with {} known tabs", history.borrow().len());
}

fn register_tab_listeners(history: &SharedHistory) {
    let on_created = {
        let history = history.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |tab_js: JsValue| {
            match serde_wasm_bindgen::from_value::<TabInfo>(tab_js) {
                Ok(tab) => {
                    tracker::tab_created(&mut history.borrow_mut(), &tab, js_sys::Date::now());
                    flush(&history);
                }
                Err(e) => log::warn!("Failed to parse created tab: {:?}", e),
            }
        })
    };

    let on_activated = {
        let history = history.clone();
        Closure::<dyn FnMut(JsValue)>::new(move |info_js: JsValue| {
            match serde_wasm_bindgen::from_value::<ActiveInfo>(info_js) {
                Ok(info) => {
                    tracker::tab_switched(
                        &mut history.borrow_mut(),
                        info.tab_id,
                        info.previous_tab_id,
                        js_sys::Date::now(),
                    );
                    flush(&history);
                }
                Err(e) => log::warn!("Failed to parse activation: {:?}", e),
            }
        })
    };

    let on_updated = {
        let history = history.clone();
        Closure::<dyn FnMut(i32, JsValue, JsValue)>::new(
            move |tab_id: i32, change_js: JsValue, tab_js: JsValue| {
                let change: ChangeInfo = serde_wasm_bindgen::from_value(change_js).unwrap_or_default();
                if change.url.is_none() {
                    return;
                }
                let title = serde_wasm_bindgen::from_value::<TabInfo>(tab_js)
                    .ok()
                    .and_then(|tab| tab.title);

                tracker::tab_updated(
                    &mut history.borrow_mut(),
                    tab_id,
                    change.url.as_deref(),
                    title.as_deref(),
                    js_sys::Date::now(),
                );
                flush(&history);
            },
        )
    };

    let on_removed = {
        let history = history.clone();
        Closure::<dyn FnMut(i32)>::new(move |tab_id: i32| {
            tracker::tab_removed(&mut history.borrow_mut(), tab_id);
            flush(&history);
        })
    };

    addTabListeners(
        on_created.as_ref().unchecked_ref(),
        on_activated.as_ref().unchecked_ref(),
        on_updated.as_ref().unchecked_ref(),
        on_removed.as_ref().unchecked_ref(),
    );

    // Listeners live as long as the background page
    on_created.forget();
    on_activated.forget();
    on_updated.forget();
    on_removed.forget();
}

fn register_save_listener(history: &SharedHistory) {
    let history = history.clone();
    let on_save = Closure::<dyn FnMut()>::new(move || {
        let history = history.clone();
        spawn_local(async move {
            if let Err(e) = save_tabs(&history).await {
                log::error!("Error saving tabs: {}", e);
            }
        });
    });

    addSaveListener(on_save.as_ref().unchecked_ref());
    on_save.forget();
}

/// Generate the document and hand it to the configured destination
async fn save_tabs(history: &SharedHistory) -> Result<(), String> {
    let method = load_save_method().await;
    let tabs = get_current_tabs().await?;

    let now = js_sys::Date::now();
    let markdown = build_markdown(&tabs, &history.borrow(), &LocalTime, now);
    let filename = export_filename_at(now);

    match method {
        SaveMethod::Editor => {
            let url = editor_url(&editorPageUrl(), &markdown, &filename)?;
            openTab(&url)
                .await
                .map_err(|e| format!("Failed to open editor: {:?}", e))?;
        }
        SaveMethod::Direct => {
            downloadText(&markdown, &filename, false)
                .await
                .map_err(|e| format!("Download failed: {:?}", e))?;
        }
        SaveMethod::Clipboard => {
            copyInActiveTab(&markdown)
                .await
                .map_err(|e| format!("Copy failed: {:?}", e))?;
        }
    }

    log::info!("Saved {} tabs ({})", tabs.len(), method.as_str());
    Ok(())
}

// Helper functions

async fn get_current_tabs() -> Result<Vec<TabInfo>, String> {
    let tabs_js = getCurrentWindowTabs()
        .await
        .map_err(|e| format!("Failed to get tabs: {:?}", e))?;

    serde_wasm_bindgen::from_value(tabs_js).map_err(|e| format!("Failed to parse tabs: {:?}", e))
}

async fn load_save_method() -> SaveMethod {
    match getStorage(SAVE_METHOD_KEY).await {
        Ok(value) => SaveMethod::parse(value.as_string().as_deref()),
        Err(e) => {
            log::warn!("Failed to read save method: {:?}", e);
            SaveMethod::default()
        }
    }
}

/// Stored history, or an empty one that still has to be written
async fn load_history() -> TabHistory {
    match read_history().await {
        Ok(Some(history)) => history,
        Ok(None) => {
            let mut history = TabHistory::new();
            history.mark_dirty();
            history
        }
        Err(e) => {
            log::error!("{}", e);
            TabHistory::new()
        }
    }
}

async fn read_history() -> Result<Option<TabHistory>, String> {
    let stored = getStorage(HISTORY_KEY)
        .await
        .map_err(|e| format!("Failed to get tab history: {:?}", e))?;

    if stored.is_null() || stored.is_undefined() {
        return Ok(None);
    }

    let json: String = js_sys::JSON::stringify(&stored)
        .map_err(|e| format!("Failed to read tab history: {:?}", e))?
        .into();
    TabHistory::from_json(&json).map(Some)
}

/// Write the history back if it changed
fn flush(history: &SharedHistory) {
    let json = match history.borrow_mut().take_dirty_json() {
        Ok(Some(json)) => json,
        Ok(None) => return,
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    };

    spawn_local(async move {
        if let Err(e) = write_history(&json).await {
            log::error!("{}", e);
        }
    });
}

async fn write_history(json: &str) -> Result<(), String> {
    let value = js_sys::JSON::parse(json).map_err(|e| format!("Failed to encode tab history: {:?}", e))?;

    setStorage(HISTORY_KEY, value)
        .await
        .map_err(|e| format!("Failed to save tab history: {:?}", e))
}
