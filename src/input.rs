use std::sync::Arc;

use anyhow::Result;
use arboard::Clipboard;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::UnboundedSender;
use tracing::error;

use crate::bridge::PanelController;
use crate::document::Document;
use crate::models::{AppEvent, OverlayPhase, PanelPhase, Pos, SelectionEvent};
use crate::network::SummaryClient;
use crate::overlay::OverlayController;
use crate::ui::OverlayScreen;

pub fn handle_key(
    key: KeyCode,
    document: &Document,
    scroll_y: &mut usize,
    viewport_height: usize,
    controller: &OverlayController,
    panel: &mut PanelController,
) -> Result<bool> {
    let max_scroll = document.line_count().saturating_sub(1);
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            *scroll_y = scroll_y.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            *scroll_y = (*scroll_y + 1).min(max_scroll);
        }
        KeyCode::PageUp => {
            *scroll_y = scroll_y.saturating_sub(viewport_height);
        }
        KeyCode::PageDown => {
            *scroll_y = (*scroll_y + viewport_height).min(max_scroll);
        }
        KeyCode::Char('p') => {
            panel.open();
        }
        KeyCode::Enter => {
            if panel.is_open() {
                panel.trigger_page_summary();
            }
        }
        KeyCode::Char('c') => {
            // Copy whichever summary is on screen.
            let markup = match controller.overlay().map(|o| &o.phase) {
                Some(OverlayPhase::ShowingResult(text)) => Some(text.clone()),
                _ => match panel.phase() {
                    PanelPhase::ShowingResult(text) if panel.is_open() => Some(text.clone()),
                    _ => None,
                },
            };
            if let Some(text) = markup {
                let mut clipboard = Clipboard::new().ok();
                if let Some(cb) = clipboard.as_mut() {
                    let _ = cb.set_text(text);
                }
            }
        }
        KeyCode::Esc => {
            panel.close();
        }
        KeyCode::Char('q') => return Ok(false),
        _ => {}
    }
    Ok(true)
}

#[allow(clippy::too_many_arguments)]
pub fn handle_mouse(
    event: MouseEvent,
    document: &Document,
    scroll_y: &mut usize,
    selection_anchor: &mut Option<Pos>,
    selection_head: &mut Option<Pos>,
    controller: &mut OverlayController,
    overlay_screen: Option<OverlayScreen>,
    viewport: Rect,
    client: &Arc<SummaryClient>,
    events: &UnboundedSender<AppEvent>,
    rt: &Runtime,
) {
    let pos = Pos {
        row: *scroll_y + event.row.saturating_sub(viewport.y) as usize,
        col: event.column.saturating_sub(viewport.x) as usize,
    };
    let inside_overlay = overlay_screen
        .map(|s| contains(s.area, event.column, event.row))
        .unwrap_or(false);
    // Only events inside the document viewport take part in selection;
    // clicks on the footer are not clicks on the page.
    let inside_viewport = contains(viewport, event.column, event.row);

    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if inside_viewport && !inside_overlay {
                *selection_anchor = Some(pos);
                *selection_head = Some(pos);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if selection_anchor.is_some() && inside_viewport && !inside_overlay {
                *selection_head = Some(pos);
            }
        }
        MouseEventKind::Up(MouseButton::Left) if inside_viewport || inside_overlay => {
            let selection = match (*selection_anchor, *selection_head) {
                (Some(anchor), Some(head)) => document.snapshot(anchor, head).map(|mut snap| {
                    // The controller expects a viewport-relative rectangle.
                    snap.rect.top -= *scroll_y as i32;
                    snap
                }),
                _ => None,
            };
            controller.on_pointer_release(&SelectionEvent {
                selection,
                scroll_y: *scroll_y as i32,
                inside_overlay,
            });

            if inside_overlay {
                let on_button = overlay_screen
                    .map(|s| contains(s.button, event.column, event.row))
                    .unwrap_or(false);
                if on_button {
                    if let Some(text) = controller.begin_summarize() {
                        let client = Arc::clone(client);
                        let events = events.clone();
                        rt.spawn(async move {
                            match client.get_summary(&text).await {
                                Ok(summary) => {
                                    let _ = events.send(AppEvent::SummaryReady(summary));
                                }
                                // Swallowed at the boundary: the button stays
                                // at "Summarizing...".
                                Err(err) => error!("selection summary failed: {err:#}"),
                            }
                        });
                    }
                }
            }
        }
        MouseEventKind::ScrollUp => {
            *scroll_y = scroll_y.saturating_sub(2);
        }
        MouseEventKind::ScrollDown => {
            *scroll_y = (*scroll_y + 2).min(document.line_count().saturating_sub(1));
        }
        _ => {}
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x + area.width
        && row >= area.y
        && row < area.y + area.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::path::PathBuf;
    use tokio::sync::mpsc::unbounded_channel;

    fn press(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn footer_clicks_do_not_start_a_selection() {
        let document = Document {
            path: PathBuf::from("t"),
            lines: vec!["some line".into(); 10],
        };
        let mut scroll_y = 0;
        let mut anchor = None;
        let mut head = None;
        let mut controller = OverlayController::with_margin(2);
        let client = Arc::new(SummaryClient::new(
            "http://localhost".into(),
            "k".into(),
            "m".into(),
        ));
        let (events, _events_rx) = unbounded_channel();
        let rt = Runtime::new().unwrap();
        let viewport = Rect { x: 0, y: 0, width: 80, height: 21 };

        // Press lands on the footer, below the viewport.
        handle_mouse(
            press(5, 22),
            &document,
            &mut scroll_y,
            &mut anchor,
            &mut head,
            &mut controller,
            None,
            viewport,
            &client,
            &events,
            &rt,
        );
        assert!(anchor.is_none());
        assert!(head.is_none());

        // The same press inside the viewport anchors a selection.
        handle_mouse(
            press(5, 3),
            &document,
            &mut scroll_y,
            &mut anchor,
            &mut head,
            &mut controller,
            None,
            viewport,
            &client,
            &events,
            &rt,
        );
        assert_eq!(anchor, Some(Pos { row: 3, col: 5 }));
    }
}
