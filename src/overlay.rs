use tracing::debug;

use crate::models::{Overlay, OverlayPhase, OverlayPosition, SelectionEvent};

/// Selections must be strictly longer than this (trimmed, in chars).
pub const MIN_SELECTION_CHARS: usize = 200;
/// And strictly shorter than this.
pub const MAX_SELECTION_CHARS: usize = 7000;
/// Vertical offset above the selection. 50 matches pixel UIs; the terminal
/// front end constructs the controller with a cell-sized margin instead.
pub const DEFAULT_MARGIN: i32 = 50;

/// Holds the single optional overlay and drives its lifecycle from selection
/// events. At most one overlay exists at any time: it is created on the
/// first valid selection, repositioned on every further valid selection, and
/// removed as soon as a selection falls outside the length bounds.
pub struct OverlayController {
    overlay: Option<Overlay>,
    margin: i32,
}

impl OverlayController {
    pub fn new() -> Self {
        Self::with_margin(DEFAULT_MARGIN)
    }

    pub fn with_margin(margin: i32) -> Self {
        Self { overlay: None, margin }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.overlay.is_some()
    }

    /// Feed a pointer-release event through the state machine. Releases that
    /// land inside the overlay itself are ignored so interacting with the
    /// overlay cannot dismiss it.
    pub fn on_pointer_release(&mut self, event: &SelectionEvent) {
        if event.inside_overlay {
            return;
        }

        let valid = event.selection.as_ref().filter(|snapshot| {
            let len = snapshot.text.trim().chars().count();
            len > MIN_SELECTION_CHARS && len < MAX_SELECTION_CHARS
        });

        match valid {
            Some(snapshot) => {
                let position = OverlayPosition {
                    top: event.scroll_y + snapshot.rect.top - self.margin,
                    left: snapshot.rect.left,
                };
                match self.overlay.as_mut() {
                    // Already visible: reposition and re-capture, never
                    // create a second overlay.
                    Some(overlay) => {
                        overlay.position = position;
                        overlay.pending_text = snapshot.text.clone();
                    }
                    None => {
                        self.overlay = Some(Overlay {
                            position,
                            phase: OverlayPhase::Idle,
                            pending_text: snapshot.text.clone(),
                        });
                    }
                }
            }
            None => {
                self.overlay = None;
            }
        }
    }

    /// Idle -> Summarizing. Returns the captured text to summarize, or
    /// `None` when there is nothing to do (hidden, already summarizing, or
    /// showing a result). The phase flip happens synchronously, before any
    /// network work starts.
    pub fn begin_summarize(&mut self) -> Option<String> {
        let overlay = self.overlay.as_mut()?;
        if overlay.phase != OverlayPhase::Idle {
            return None;
        }
        overlay.phase = OverlayPhase::Summarizing;
        Some(overlay.pending_text.clone())
    }

    /// Summarizing -> ShowingResult. A selection event may have removed the
    /// overlay while the request was in flight; in that case the result is
    /// dropped, matching the original behavior where the async completion
    /// wrote into a detached element.
    pub fn finish_summarize(&mut self, summary: String) {
        match self.overlay.as_mut() {
            Some(overlay) if overlay.phase == OverlayPhase::Summarizing => {
                overlay.phase = OverlayPhase::ShowingResult(summary);
            }
            _ => {
                debug!("summary arrived after the overlay was dismissed; dropping it");
            }
        }
    }
}
