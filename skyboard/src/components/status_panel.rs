//! Placeholder shown instead of the table while loading or after a failure

use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::{Component, REFRESHING_LABEL};
use crate::action::Action;

pub const SPINNERS: [&str; 4] = ["◐", "◓", "◑", "◒"];
pub const LOADING_TEXT: &str = "Loading latest weather data...";
pub const ERROR_TEXT: &str = "Failed to fetch weather data.";

pub struct StatusPanel;

pub enum StatusPanelProps {
    Loading { tick_count: u32 },
    /// `is_refreshing` swaps the retry hint for a spinner
    Error {
        is_refreshing: bool,
        tick_count: u32,
    },
}

impl Component<Action> for StatusPanel {
    type Props<'a> = StatusPanelProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let lines = match props {
            StatusPanelProps::Loading { tick_count } => {
                vec![spinner_line(tick_count, LOADING_TEXT)]
            }
            StatusPanelProps::Error {
                is_refreshing,
                tick_count,
            } => {
                let hint = if is_refreshing {
                    spinner_line(tick_count, REFRESHING_LABEL)
                } else {
                    Line::from(vec![
                        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                        Span::styled("r", Style::default().fg(Color::Cyan).bold()),
                        Span::styled(
                            " to retry, or wait for the next refresh",
                            Style::default().fg(Color::DarkGray),
                        ),
                    ])
                };
                vec![
                    Line::styled(ERROR_TEXT, Style::default().fg(Color::Red).bold()),
                    Line::from(""),
                    hint,
                ]
            }
        };

        let height = lines.len() as u16;
        let [centered] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let lines: Vec<Line> = lines.into_iter().map(Line::centered).collect();
        frame.render_widget(Paragraph::new(lines), centered);
    }
}

fn spinner_line(tick_count: u32, text: &str) -> Line<'static> {
    let spinner = SPINNERS[(tick_count as usize / 2) % SPINNERS.len()];
    Line::from(vec![
        Span::styled(spinner, Style::default().fg(Color::Cyan)),
        Span::styled(format!(" {text}"), Style::default().fg(Color::Gray)),
    ])
}
