/// History list components

use yew::prelude::*;

use crate::display::{entry_title, preview, relative_age};
use crate::history::{HistoryEntry, HistoryList};

#[derive(Properties, PartialEq)]
pub struct HistoryCardProps {
    pub entry: HistoryEntry,
    pub index: usize,
    /// Epoch millis used for the relative age
    pub now: i64,
    pub on_select: Callback<usize>,
}

#[function_component(HistoryCard)]
pub fn history_card(props: &HistoryCardProps) -> Html {
    let entry = &props.entry;
    let onclick = {
        let index = props.index;
        props.on_select.reform(move |_: MouseEvent| index)
    };

    html! {
        <div class="history-item" {onclick}>
            <div class="history-item-title">{entry_title(&entry.title)}</div>
            <div class="history-item-preview">{preview(&entry.summary)}</div>
            <div class="history-item-meta">
                <span class="history-item-date">{"🕒 "}{relative_age(entry.timestamp, props.now)}</span>
                <span class="history-item-type">{entry.mode.label()}</span>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct HistoryListViewProps {
    pub history: HistoryList,
    pub now: i64,
    pub on_select: Callback<usize>,
}

#[function_component(HistoryListView)]
pub fn history_list_view(props: &HistoryListViewProps) -> Html {
    if props.history.is_empty() {
        return html! {
            <p class="empty-state">{"No history yet. Generate your first summary!"}</p>
        };
    }

    html! {
        <div class="history-list">
            {for props.history.iter().enumerate().map(|(index, entry)| html! {
                <HistoryCard
                    key={format!("{}-{}", entry.timestamp, index)}
                    entry={entry.clone()}
                    index={index}
                    now={props.now}
                    on_select={props.on_select.clone()}
                />
            })}
        </div>
    }
}
