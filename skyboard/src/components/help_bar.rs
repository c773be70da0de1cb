use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;

pub struct HelpBar;

pub struct HelpBarProps {
    /// Hide the refresh hint while the control is disabled
    pub can_refresh: bool,
    /// The table has rows out of view
    pub can_scroll: bool,
}

impl Component<Action> for HelpBar {
    type Props<'a> = HelpBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let key = Style::default().fg(Color::Cyan).bold();
        let hint = Style::default().fg(Color::DarkGray);

        let mut spans = Vec::with_capacity(6);
        if props.can_refresh {
            spans.push(Span::styled(" r", key));
            spans.push(Span::styled(" refresh  ", hint));
        }
        if props.can_scroll {
            spans.push(Span::styled("j/k", key));
            spans.push(Span::styled(" scroll  ", hint));
        }
        spans.push(Span::styled("q", key));
        spans.push(Span::styled(" quit ", hint));

        frame.render_widget(Paragraph::new(Line::from(spans).centered()), area);
    }
}
