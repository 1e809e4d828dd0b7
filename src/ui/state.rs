/// Popup state machine, driven through `use_reducer`
use std::rc::Rc;
use yew::prelude::*;

use crate::history::HistoryList;
use crate::mode::SummaryMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Freshly opened; the summarize pane shows but no tab is highlighted
    Unselected,
    Summarize,
    History,
}

/// What the summary area currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Empty,
    Loading,
    Markup(String),
    /// A user-facing failure message
    Message(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PopupAction {
    SelectTab(Panel),
    SelectMode(SummaryMode),
    HistoryLoaded(Result<HistoryList, String>),
    ViewEntry(usize),
    GenerationStarted,
    /// Markup on success, the message to show on failure
    GenerationFinished(Result<String, String>),
    CopyAcknowledged,
    CopyReset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopupState {
    pub panel: Panel,
    pub mode: SummaryMode,
    pub output: Output,
    pub copy_visible: bool,
    pub copied: bool,
    pub history: HistoryList,
    pub history_error: Option<String>,
}

impl Default for PopupState {
    fn default() -> Self {
        PopupState {
            panel: Panel::Unselected,
            mode: SummaryMode::Brief,
            output: Output::Empty,
            copy_visible: false,
            copied: false,
            history: HistoryList::new(),
            history_error: None,
        }
    }
}

impl PopupState {
    pub fn apply(&self, action: PopupAction) -> PopupState {
        let mut next = self.clone();

        match action {
            PopupAction::SelectTab(panel) => {
                next.panel = panel;
            }
            PopupAction::SelectMode(mode) => {
                next.mode = mode;
            }
            PopupAction::HistoryLoaded(Ok(history)) => {
                next.history = history;
                next.history_error = None;
            }
            PopupAction::HistoryLoaded(Err(message)) => {
                next.history_error = Some(message);
            }
            PopupAction::ViewEntry(index) => {
                // Stored markup is shown verbatim, never re-formatted
                if let Some(entry) = self.history.get(index) {
                    next.panel = Panel::Summarize;
                    next.output = Output::Markup(entry.summary.clone());
                    next.copy_visible = true;
                    next.copied = false;
                }
            }
            PopupAction::GenerationStarted => {
                next.output = Output::Loading;
                next.copy_visible = false;
                next.copied = false;
            }
            PopupAction::GenerationFinished(Ok(markup)) => {
                next.output = Output::Markup(markup);
                next.copy_visible = true;
            }
            PopupAction::GenerationFinished(Err(message)) => {
                next.output = Output::Message(message);
                next.copy_visible = false;
            }
            PopupAction::CopyAcknowledged => {
                next.copied = true;
            }
            PopupAction::CopyReset => {
                next.copied = false;
            }
        }

        next
    }

    pub fn is_loading(&self) -> bool {
        self.output == Output::Loading
    }

    /// The summarize pane is visible unless History is selected
    pub fn shows_summarize(&self) -> bool {
        self.panel != Panel::History
    }
}

impl Reducible for PopupState {
    type Action = PopupAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new(self.apply(action))
    }
}
