/// Popup UI for the article summarizer

use log::error;
use patternfly_yew::prelude::*;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlElement, HtmlSelectElement};
use yew::prelude::*;

use crate::bridge;
use crate::error::SummarizeError;
use crate::history::now_millis;
use crate::mode::SummaryMode;
use crate::summarizer::{BrowserHost, Summarizer};
use crate::ui::components::HistoryListView;
use crate::ui::state::{Output, Panel, PopupAction, PopupState};

const COPY_ACK_MS: u32 = 2000;

type ExtensionSummarizer = Summarizer<BrowserHost>;

#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer(PopupState::default);
    let summarizer = use_memo((), |_| ExtensionSummarizer::for_extension());
    let summary_ref = use_node_ref();

    // Load history on mount
    {
        let summarizer = summarizer.clone();
        let dispatcher = state.dispatcher();
        use_effect_with((), move |_| {
            load_history(summarizer, dispatcher);
            || ()
        });
    }

    let on_tab_click = {
        let summarizer = summarizer.clone();
        let dispatcher = state.dispatcher();
        move |panel: Panel| {
            let summarizer = summarizer.clone();
            let dispatcher = dispatcher.clone();
            Callback::from(move |_: MouseEvent| {
                dispatcher.dispatch(PopupAction::SelectTab(panel));
                if panel == Panel::History {
                    load_history(summarizer.clone(), dispatcher.clone());
                }
            })
        }
    };

    let on_mode_change = {
        let dispatcher = state.dispatcher();
        Callback::from(move |e: Event| {
            if let Some(select) = e.target_dyn_into::<HtmlSelectElement>() {
                dispatcher.dispatch(PopupAction::SelectMode(SummaryMode::parse(&select.value())));
            }
        })
    };

    let on_summarize = {
        let summarizer = summarizer.clone();
        let dispatcher = state.dispatcher();
        let mode = state.mode;

        Callback::from(move |_: MouseEvent| {
            if summarizer.is_busy() {
                return;
            }

            let summarizer = summarizer.clone();
            let dispatcher = dispatcher.clone();
            dispatcher.dispatch(PopupAction::GenerationStarted);

            spawn_local(async move {
                match summarizer.summarize(mode).await {
                    Ok(summary) => {
                        dispatcher.dispatch(PopupAction::GenerationFinished(Ok(summary.markup)));
                    }
                    // The running request will report its own result
                    Err(SummarizeError::Busy) => {}
                    Err(e) => {
                        dispatcher.dispatch(PopupAction::GenerationFinished(Err(e.to_string())));
                    }
                }
            });
        })
    };

    let on_copy = {
        let summary_ref = summary_ref.clone();
        let dispatcher = state.dispatcher();

        Callback::from(move |_: MouseEvent| {
            let Some(element) = summary_ref.cast::<HtmlElement>() else {
                return;
            };
            let text = element.inner_text();
            if text.trim().is_empty() {
                return;
            }

            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                match bridge::copy_to_clipboard(&text).await {
                    Ok(()) => {
                        dispatcher.dispatch(PopupAction::CopyAcknowledged);
                        let _ = bridge::delay(COPY_ACK_MS).await;
                        dispatcher.dispatch(PopupAction::CopyReset);
                    }
                    Err(e) => {
                        error!("Failed to copy text: {}", bridge::describe_js_error(&e));
                    }
                }
            });
        })
    };

    let on_clear_history = {
        let summarizer = summarizer.clone();
        let dispatcher = state.dispatcher();

        Callback::from(move |_: MouseEvent| {
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Are you sure you want to clear all history?").ok())
                .unwrap_or(false);
            if !confirmed {
                return;
            }

            let summarizer = summarizer.clone();
            let dispatcher = dispatcher.clone();
            spawn_local(async move {
                if let Err(e) = summarizer.history().clear().await {
                    error!("Failed to clear history: {}", e);
                }
                load_history(summarizer, dispatcher);
            });
        })
    };

    let on_view_entry = {
        let dispatcher = state.dispatcher();
        Callback::from(move |index: usize| {
            dispatcher.dispatch(PopupAction::ViewEntry(index));
        })
    };

    let tab_class = |panel: Panel| {
        if state.panel == panel {
            "pf-v5-c-tabs__item pf-m-current"
        } else {
            "pf-v5-c-tabs__item"
        }
    };

    html! {
        <div class="popup">
            <h1 class="popup-title">{"Article Summarizer"}</h1>

            // Tab navigation
            <div class="pf-v5-c-tabs tabs-nav">
                <ul class="pf-v5-c-tabs__list">
                    <li class={tab_class(Panel::Summarize)}>
                        <button class="pf-v5-c-tabs__link" onclick={on_tab_click(Panel::Summarize)}>
                            <span class="pf-v5-c-tabs__item-text">{"Summarize"}</span>
                        </button>
                    </li>
                    <li class={tab_class(Panel::History)}>
                        <button class="pf-v5-c-tabs__link" onclick={on_tab_click(Panel::History)}>
                            <span class="pf-v5-c-tabs__item-text">{"History"}</span>
                        </button>
                    </li>
                </ul>
            </div>

            if state.shows_summarize() {
                <div class="tab-pane-content">
                    <div class="controls">
                        <select class="summary-type" onchange={on_mode_change} disabled={state.is_loading()}>
                            {for SummaryMode::ALL.iter().map(|mode| html! {
                                <option value={mode.as_str()} selected={*mode == state.mode}>
                                    {mode.label()}
                                </option>
                            })}
                        </select>
                        <Button onclick={on_summarize} disabled={state.is_loading()} variant={ButtonVariant::Primary} block={true}>
                            {"Summarize This Page"}
                        </Button>
                    </div>

                    <div class="summary-content" ref={summary_ref}>
                        {match &state.output {
                            Output::Empty => html! {},
                            Output::Loading => html! {
                                <div class="loading">
                                    <Spinner />
                                </div>
                            },
                            Output::Markup(markup) => Html::from_html_unchecked(AttrValue::from(markup.clone())),
                            Output::Message(message) => html! {
                                <Alert r#type={AlertType::Warning} title={message.clone()} inline={true}>
                                </Alert>
                            },
                        }}
                    </div>

                    if state.copy_visible {
                        <Button onclick={on_copy} variant={ButtonVariant::Secondary} block={true}>
                            {if state.copied { "Copied!" } else { "Copy Summary" }}
                        </Button>
                    }
                </div>
            } else {
                <div class="tab-pane-content">
                    <div class="history-header">
                        <h2 class="history-title">{"Recent Summaries"}</h2>
                        <Button onclick={on_clear_history} variant={ButtonVariant::Danger}>
                            {"Clear History"}
                        </Button>
                    </div>

                    if let Some(err) = &state.history_error {
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    }

                    <HistoryListView history={state.history.clone()} now={now_millis()} on_select={on_view_entry} />
                </div>
            }
        </div>
    }
}

fn load_history(summarizer: Rc<ExtensionSummarizer>, dispatcher: UseReducerDispatcher<PopupState>) {
    spawn_local(async move {
        let result = summarizer
            .history()
            .load()
            .await
            .map_err(|e| format!("Failed to load history: {}", e));
        dispatcher.dispatch(PopupAction::HistoryLoaded(result));
    });
}
