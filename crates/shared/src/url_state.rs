use crate::debounce::{Debouncer, Ticket};
use crate::mode::InteractionMode;
use crate::view_state::{merge_query, ViewPatch, ViewState};

/// How a query-string write lands in the browser history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryWrite {
    /// Rewrite the current entry.
    #[default]
    Replace,
    /// Add a navigation entry.
    Push,
}

/// Where the query string lives.
pub trait HistoryBackend {
    /// Current query string, with or without the leading `?`.
    fn query(&self) -> String;
    fn write(&mut self, query: &str, how: HistoryWrite);
}

/// Keeps the URL's view parameters in step with the map.
pub struct UrlStateSync<H> {
    history: H,
    pending: Debouncer<ViewPatch>,
    mode_write: HistoryWrite,
}

impl<H: HistoryBackend> UrlStateSync<H> {
    pub fn new(history: H, mode_write: HistoryWrite) -> Self {
        UrlStateSync {
            history,
            pending: Debouncer::new(),
            mode_write,
        }
    }

    pub fn current(&self) -> ViewState {
        ViewState::from_query(&self.history.query())
    }

    /// Merge `patch` into the query string now, replacing the history entry.
    pub fn update_view_state(&mut self, patch: &ViewPatch) {
        self.write(patch, HistoryWrite::Replace);
    }

    /// Queue a pan/zoom patch. Arm a timer and pass the ticket to
    /// [`UrlStateSync::flush`] when it elapses.
    pub fn schedule_view_update(&mut self, patch: ViewPatch) -> Ticket {
        self.pending.schedule(patch)
    }

    /// Write the queued patch if `ticket` is still the latest one. Returns
    /// whether anything was written.
    pub fn flush(&mut self, ticket: Ticket) -> bool {
        match self.pending.fire(ticket) {
            Some(patch) => {
                self.update_view_state(&patch);
                true
            }
            None => false,
        }
    }

    /// Forget any queued patch; its ticket will write nothing.
    pub fn cancel_pending(&mut self) {
        self.pending.cancel();
    }

    pub fn set_mode_param(&mut self, mode: InteractionMode) {
        self.write(&ViewPatch::mode(mode), self.mode_write);
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    fn write(&mut self, patch: &ViewPatch, how: HistoryWrite) {
        if patch.is_empty() {
            return;
        }
        let query = merge_query(&self.history.query(), patch);
        tracing::trace!(%query, ?how, "writing view state");
        self.history.write(&query, how);
    }
}
