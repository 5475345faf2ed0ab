/// Popup UI for Tab Saver extension

use patternfly_yew::prelude::*;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::platform::time::sleep;
use yew::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn requestSave() -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn openOptionsPage() -> Result<(), JsValue>;
}

#[derive(Clone, PartialEq)]
enum AppState {
    Idle,
    Saving,
    Saved,
    Error(String),
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_state(|| AppState::Idle);

    // Save tabs handler
    let on_save = {
        let state = state.clone();

        Callback::from(move |_| {
            let state = state.clone();
            state.set(AppState::Saving);

            spawn_local(async move {
                match requestSave().await {
                    Ok(_) => {
                        sleep(Duration::from_millis(500)).await;
                        state.set(AppState::Saved);
                        sleep(Duration::from_millis(1_500)).await;
                        state.set(AppState::Idle);
                        close_popup();
                    }
                    Err(e) => {
                        log::error!("Save request failed: {:?}", e);
                        state.set(AppState::Error(format!("Failed to save: {:?}", e)));
                    }
                }
            });
        })
    };

    // Options link handler
    let on_options = Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        spawn_local(async move {
            if let Err(e) = openOptionsPage().await {
                log::error!("Failed to open options: {:?}", e);
            }
            close_popup();
        });
    });

    let is_busy = !matches!(*state, AppState::Idle | AppState::Error(_));
    let label = match &*state {
        AppState::Saving => "Saving...",
        AppState::Saved => "Saved! Check your downloads",
        _ => "💾 Save tabs",
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Saver"}</h1>

            if let AppState::Error(err) = &*state {
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    {err.clone()}
                </Alert>
            }

            <div class="flex-column-gap">
                <Button onclick={on_save} disabled={is_busy} variant={ButtonVariant::Primary} block={true}>
                    {label}
                </Button>
            </div>

            <p class="footer-popup">
                <a id="optionsLink" href="#" onclick={on_options}>{"Options"}</a>
            </p>
        </div>
    }
}

fn close_popup() {
    if let Some(window) = web_sys::window() {
        let _ = window.close();
    }
}
