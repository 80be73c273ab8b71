use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub text: Style,
    pub selection: Style,
    pub footer: Style,

    pub overlay_border: Style,
    pub overlay_button: Style,
    pub overlay_button_disabled: Style,
    pub overlay_text: Style,

    pub panel_border: Style,
    pub panel_trigger: Style,
    pub panel_trigger_disabled: Style,
    pub panel_text: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Style::default().fg(Color::White),
            selection: Style::default().bg(Color::DarkGray).fg(Color::Yellow),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),

            overlay_border: Style::default().fg(Color::Magenta).bg(Color::Black),
            overlay_button: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            overlay_button_disabled: Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            overlay_text: Style::default().fg(Color::White),

            panel_border: Style::default().fg(Color::Cyan).bg(Color::Black),
            panel_trigger: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            panel_trigger_disabled: Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            panel_text: Style::default().fg(Color::White),
        }
    }
}
