/// A position in document coordinates (cells, zero-based). Ordering is
/// row-major, so min/max give the start and end of a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

/// Bounding rectangle of a selection, viewport-relative, in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionRect {
    pub top: i32,
    pub left: i32,
    pub width: u16,
    pub height: u16,
}

/// Captured at pointer release: the selected string and where it sits.
/// Discarded as soon as the selection changes or the overlay closes.
#[derive(Clone, Debug)]
pub struct SelectionSnapshot {
    pub text: String,
    pub rect: SelectionRect,
}

/// What the overlay controller receives on every pointer release.
#[derive(Clone, Debug)]
pub struct SelectionEvent {
    pub selection: Option<SelectionSnapshot>,
    pub scroll_y: i32,
    pub inside_overlay: bool,
}

/// Absolute document position of the overlay (may land above row 0, the
/// renderer clamps).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayPosition {
    pub top: i32,
    pub left: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverlayPhase {
    Idle,
    Summarizing,
    ShowingResult(String),
}

/// The overlay singleton. Exists exactly while a pending selection is active.
#[derive(Clone, Debug)]
pub struct Overlay {
    pub position: OverlayPosition,
    pub phase: OverlayPhase,
    /// Text captured from the selection the overlay was shown for.
    pub pending_text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelPhase {
    Idle,
    Summarizing,
    ShowingResult(String),
}

/// Completions finished off the UI thread, drained by the main loop.
#[derive(Debug)]
pub enum AppEvent {
    SummaryReady(String),
}
