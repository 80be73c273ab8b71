use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::bridge::PanelController;
use crate::document::Document;
use crate::models::{OverlayPhase, PanelPhase, Pos};
use crate::overlay::OverlayController;
use crate::theme::Theme;

pub const OVERLAY_WIDTH: u16 = 44;
pub const RESULT_HEIGHT: u16 = 12;

/// Screen-space rectangles of the overlay from the last draw, used by the
/// input layer for hit testing.
#[derive(Clone, Copy, Debug)]
pub struct OverlayScreen {
    pub area: Rect,
    pub button: Rect,
}

/// Renders the whole frame: document viewport, overlay, panel popup, footer.
/// Returns where the overlay ended up on screen, if it is visible.
pub fn render(
    f: &mut Frame,
    document: &Document,
    scroll_y: usize,
    selection: Option<(Pos, Pos)>,
    controller: &OverlayController,
    panel: &PanelController,
    theme: &Theme,
) -> Option<OverlayScreen> {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(f.area());
    let viewport = chunks[0];

    render_document(f, document, scroll_y, selection, viewport, theme);

    let footer = Paragraph::new(
        "Select text with the mouse | click the overlay to summarize | p Page summary | c Copy | Esc Close | q Quit",
    )
    .block(Block::default().borders(Borders::ALL))
    .style(theme.footer);
    f.render_widget(footer, chunks[1]);

    let overlay_screen = render_overlay(f, scroll_y, controller, viewport, theme);
    render_panel(f, panel, theme);
    overlay_screen
}

fn render_document(
    f: &mut Frame,
    document: &Document,
    scroll_y: usize,
    selection: Option<(Pos, Pos)>,
    area: Rect,
    theme: &Theme,
) {
    let range = selection.map(|(a, b)| (a.min(b), a.max(b)));
    let mut lines = Vec::with_capacity(area.height as usize);
    for offset in 0..area.height as usize {
        let row = scroll_y + offset;
        let Some(raw) = document.lines.get(row) else { break };
        lines.push(styled_line(raw, row, range, theme));
    }
    f.render_widget(Paragraph::new(lines).style(theme.text), area);
}

/// Splits one document line into plain and selected spans.
fn styled_line(raw: &str, row: usize, range: Option<(Pos, Pos)>, theme: &Theme) -> Line<'static> {
    let chars: Vec<char> = raw.chars().collect();
    let Some((start, end)) = range else {
        return Line::from(raw.to_string());
    };
    if row < start.row || row > end.row {
        return Line::from(raw.to_string());
    }
    let from = if row == start.row { start.col.min(chars.len()) } else { 0 };
    let to = if row == end.row { end.col.min(chars.len()) } else { chars.len() };
    if from >= to {
        return Line::from(raw.to_string());
    }
    let head: String = chars[..from].iter().collect();
    let mid: String = chars[from..to].iter().collect();
    let tail: String = chars[to..].iter().collect();
    Line::from(vec![
        Span::raw(head),
        Span::styled(mid, theme.selection),
        Span::raw(tail),
    ])
}

fn render_overlay(
    f: &mut Frame,
    scroll_y: usize,
    controller: &OverlayController,
    viewport: Rect,
    theme: &Theme,
) -> Option<OverlayScreen> {
    let overlay = controller.overlay()?;

    let height = match overlay.phase {
        OverlayPhase::ShowingResult(_) => RESULT_HEIGHT.min(viewport.height),
        _ => 3.min(viewport.height),
    };
    let width = OVERLAY_WIDTH.min(viewport.width);

    // The controller position is absolute document rows; map into the
    // viewport and clamp so the box never leaves the screen.
    let row = (overlay.position.top - scroll_y as i32)
        .clamp(0, (viewport.height.saturating_sub(height)) as i32) as u16;
    let col = overlay
        .position
        .left
        .clamp(0, (viewport.width.saturating_sub(width)) as i32) as u16;
    let area = Rect {
        x: viewport.x + col,
        y: viewport.y + row,
        width,
        height,
    };

    f.render_widget(Clear, area);
    let block = Block::default()
        .title("sumlens")
        .borders(Borders::ALL)
        .style(theme.overlay_border);
    let inner = block.inner(area);
    f.render_widget(block, area);

    match &overlay.phase {
        OverlayPhase::Idle => {
            let button = Paragraph::new("[ Summarize ]")
                .alignment(Alignment::Center)
                .style(theme.overlay_button);
            f.render_widget(button, inner);
        }
        OverlayPhase::Summarizing => {
            let button = Paragraph::new("Summarizing...")
                .alignment(Alignment::Center)
                .style(theme.overlay_button_disabled);
            f.render_widget(button, inner);
        }
        OverlayPhase::ShowingResult(markup) => {
            // The returned markup is shown verbatim, unsanitized.
            let para = Paragraph::new(markup.clone())
                .wrap(Wrap { trim: true })
                .style(theme.overlay_text);
            f.render_widget(para, inner);
        }
    }

    Some(OverlayScreen { area, button: inner })
}

fn render_panel(f: &mut Frame, panel: &PanelController, theme: &Theme) {
    if !panel.is_open() {
        return;
    }
    let area = centered_rect(60, 60, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .title("Page summary")
        .borders(Borders::ALL)
        .style(theme.panel_border);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let para = match panel.phase() {
        PanelPhase::Idle => Paragraph::new("[ Summarize site ]  (press Enter)")
            .alignment(Alignment::Center)
            .style(theme.panel_trigger),
        PanelPhase::Summarizing => Paragraph::new("Summarizing...")
            .alignment(Alignment::Center)
            .style(theme.panel_trigger_disabled),
        PanelPhase::ShowingResult(markup) => Paragraph::new(markup.clone())
            .wrap(Wrap { trim: true })
            .style(theme.panel_text),
    };
    f.render_widget(para, inner);
}

/// Centers a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r)[1];
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical)[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{PageMessage, bridge_channels};
    use crate::models::{SelectionEvent, SelectionRect, SelectionSnapshot};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    fn valid_event(top: i32) -> SelectionEvent {
        SelectionEvent {
            selection: Some(SelectionSnapshot {
                text: "x".repeat(300),
                rect: SelectionRect { top, left: 0, width: 20, height: 1 },
            }),
            scroll_y: 0,
            inside_overlay: false,
        }
    }

    #[test]
    fn overlay_button_label_follows_the_phase() {
        let document = Document { path: PathBuf::from("t"), lines: vec!["text".into(); 30] };
        let mut controller = OverlayController::with_margin(2);
        controller.on_pointer_release(&valid_event(10));
        let (request_tx, _request_rx, _message_tx, _message_rx) = bridge_channels();
        let panel = PanelController::new(request_tx);
        let theme = Theme::default();

        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        terminal
            .draw(|f| {
                render(f, &document, 0, None, &controller, &panel, &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("[ Summarize ]"));

        controller.begin_summarize().unwrap();
        terminal
            .draw(|f| {
                render(f, &document, 0, None, &controller, &panel, &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("Summarizing..."));
    }

    #[test]
    fn panel_swaps_trigger_for_received_markup() {
        let document = Document { path: PathBuf::from("t"), lines: vec!["text".into(); 30] };
        let controller = OverlayController::with_margin(2);
        let (request_tx, _request_rx, _message_tx, _message_rx) = bridge_channels();
        let mut panel = PanelController::new(request_tx);
        panel.open();
        let theme = Theme::default();

        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        terminal
            .draw(|f| {
                render(f, &document, 0, None, &controller, &panel, &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("[ Summarize site ]"));

        panel.trigger_page_summary();
        terminal
            .draw(|f| {
                render(f, &document, 0, None, &controller, &panel, &theme);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("Summarizing..."));

        panel.on_message(PageMessage { text: "<summary>".into() });
        terminal
            .draw(|f| {
                render(f, &document, 0, None, &controller, &panel, &theme);
            })
            .unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("<summary>"));
        assert!(!text.contains("[ Summarize site ]"));
        assert!(!text.contains("Summarizing..."));
    }

    #[test]
    fn overlay_is_clamped_into_the_viewport() {
        let document = Document { path: PathBuf::from("t"), lines: vec!["text".into(); 5] };
        let mut controller = OverlayController::with_margin(2);
        // Selection on row 0 puts the ideal position above the screen.
        controller.on_pointer_release(&valid_event(0));
        let (request_tx, _request_rx, _message_tx, _message_rx) = bridge_channels();
        let panel = PanelController::new(request_tx);
        let theme = Theme::default();

        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();
        let mut screen = None;
        terminal
            .draw(|f| {
                screen = render(f, &document, 0, None, &controller, &panel, &theme);
            })
            .unwrap();
        let screen = screen.unwrap();
        assert_eq!(screen.area.y, 0);
        assert!(screen.area.x + screen.area.width <= 60);
    }
}
