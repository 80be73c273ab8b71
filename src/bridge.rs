//! Panel-to-document bridge: the panel (popup analog) has no access to the
//! document; it asks the page context to summarize its own text and receives
//! the result over a one-shot, best-effort message channel. The two sides are
//! independent single-threaded actors and share no state.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, error, info};

use crate::models::PanelPhase;
use crate::network::SummaryClient;

#[derive(Debug)]
pub enum PageRequest {
    SummarizePage,
}

/// One-shot message from the page context. No acknowledgment, no reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMessage {
    pub text: String,
}

pub fn bridge_channels() -> (
    UnboundedSender<PageRequest>,
    UnboundedReceiver<PageRequest>,
    UnboundedSender<PageMessage>,
    UnboundedReceiver<PageMessage>,
) {
    let (request_tx, request_rx) = unbounded_channel();
    let (message_tx, message_rx) = unbounded_channel();
    (request_tx, request_rx, message_tx, message_rx)
}

/// The page-context actor. Owns the document's full visible text and a
/// summary client; answers each request with at most one message. Runs until
/// the request channel closes.
pub async fn run_page_context(
    page_text: String,
    client: SummaryClient,
    mut requests: UnboundedReceiver<PageRequest>,
    messages: UnboundedSender<PageMessage>,
) {
    while let Some(PageRequest::SummarizePage) = requests.recv().await {
        info!("summarizing page text ({} chars)", page_text.chars().count());
        match client.get_summary(&page_text).await {
            Ok(text) => {
                // Best effort: if the panel is already gone the message is
                // dropped silently.
                let _ = messages.send(PageMessage { text });
            }
            Err(err) => {
                // No message is ever sent on failure; the panel stays in
                // "Summarizing..." with no timeout.
                error!("page summary failed: {err:#}");
            }
        }
    }
}

/// Panel-side state. Mirrors the overlay phases; the trigger only fires from
/// `Idle`, so a second invocation while a request is in flight is impossible.
pub struct PanelController {
    phase: PanelPhase,
    open: bool,
    requests: UnboundedSender<PageRequest>,
}

impl PanelController {
    pub fn new(requests: UnboundedSender<PageRequest>) -> Self {
        Self { phase: PanelPhase::Idle, open: false, requests }
    }

    pub fn phase(&self) -> &PanelPhase {
        &self.phase
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Closing tears the panel context down, like closing the popup: the
    /// listener is gone, and the next open starts from a fresh trigger.
    pub fn close(&mut self) {
        self.open = false;
        self.phase = PanelPhase::Idle;
    }

    /// Fires the whole-page summary request. The phase flips before the
    /// request leaves, so the trigger is disabled synchronously.
    pub fn trigger_page_summary(&mut self) {
        if self.phase != PanelPhase::Idle {
            return;
        }
        self.phase = PanelPhase::Summarizing;
        let _ = self.requests.send(PageRequest::SummarizePage);
    }

    /// A message from the page context replaces the trigger with the
    /// received markup. With the panel closed there is no listener, so the
    /// message is dropped silently.
    pub fn on_message(&mut self, message: PageMessage) {
        if !self.open {
            debug!("page message arrived with the panel closed; dropping it");
            return;
        }
        self.phase = PanelPhase::ShowingResult(message.text);
    }
}
