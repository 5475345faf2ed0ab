/// Options page: where saved tabs go

use crate::storage::{SaveMethod, SAVE_METHOD_KEY};
use patternfly_yew::prelude::*;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::platform::time::sleep;
use yew::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/options.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let selected = use_state(SaveMethod::default);
    let saved = use_state(|| false);
    let error = use_state(|| None::<String>);

    // Load current setting on mount
    {
        let selected = selected.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match getStorage(SAVE_METHOD_KEY).await {
                    Ok(value) => selected.set(SaveMethod::parse(value.as_string().as_deref())),
                    Err(e) => log::warn!("Failed to load save method: {:?}", e),
                }
            });
            || ()
        });
    }

    let on_select = {
        let selected = selected.clone();
        move |method: SaveMethod| {
            let selected = selected.clone();
            Callback::from(move |_: MouseEvent| selected.set(method))
        }
    };

    let on_save = {
        let selected = selected.clone();
        let saved = saved.clone();
        let error = error.clone();

        Callback::from(move |_| {
            let method = *selected;
            let saved = saved.clone();
            let error = error.clone();

            spawn_local(async move {
                match setStorage(SAVE_METHOD_KEY, JsValue::from_str(method.as_str())).await {
                    Ok(_) => {
                        error.set(None);
                        saved.set(true);
                        sleep(Duration::from_millis(2_000)).await;
                        saved.set(false);
                    }
                    Err(e) => error.set(Some(format!("Failed to save: {:?}", e))),
                }
            });
        })
    };

    html! {
        <div class="padding-20">
            <h1 class="popup-title">{"Tab Saver Options"}</h1>
            <h2 class="stats-title">{"When saving tabs"}</h2>

            <div class="flex-column-gap">
                {for SaveMethod::ALL.iter().map(|method| {
                    let id = format!("{}Option", method.as_str());
                    let class = if *selected == *method { "option selected" } else { "option" };
                    html! {
                        <label key={id.clone()} class={class} onclick={on_select(*method)}>
                            <input
                                type="radio"
                                name="saveMethod"
                                id={id}
                                value={method.as_str()}
                                checked={*selected == *method}
                            />
                            {method.label()}
                        </label>
                    }
                })}
            </div>

            <Button onclick={on_save} variant={ButtonVariant::Primary}>
                {"Save"}
            </Button>

            if *saved {
                <Alert r#type={AlertType::Success} title={"Settings saved!"} inline={true}>
                </Alert>
            }
            if let Some(err) = (*error).clone() {
                <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                    {err}
                </Alert>
            }
        </div>
    }
}
