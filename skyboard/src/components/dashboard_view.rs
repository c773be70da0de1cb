//! Root component: picks placeholder or table by view, owns the key map
//!
//! - `r` / `F5` / click on the button: manual refresh (when allowed)
//! - `q` / `Esc` / `Ctrl+C`: quit
//! - anything else in the ready view goes to the table (scrolling)

use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::{Frame, Rect};
use ratatui::{
    layout::{Alignment, Constraint, Layout},
    style::{Color, Style, Stylize},
    widgets::{Block, Borders},
};
use skyboard_core::EventKind;

use super::{
    Component, HeaderBar, HeaderBarProps, HelpBar, HelpBarProps, StatusPanel, StatusPanelProps,
    WeatherTable, WeatherTableProps,
};
use crate::action::{Action, RefreshTrigger};
use crate::payload::WeatherPayload;
use crate::state::{DashboardState, View};

pub const TITLE: &str = "AI Weather Insights Dashboard";

pub struct DashboardViewProps<'a> {
    pub state: &'a DashboardState,
}

#[derive(Default)]
pub struct DashboardView {
    header: HeaderBar,
    table: WeatherTable,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &HeaderBar {
        &self.header
    }

    pub fn table(&self) -> &WeatherTable {
        &self.table
    }
}

impl Component<Action> for DashboardView {
    type Props<'a> = DashboardViewProps<'a>;

    fn handle_event(&mut self, event: &EventKind, props: DashboardViewProps<'_>) -> Vec<Action> {
        let state = props.state;

        if let EventKind::Key(key) = event {
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return vec![Action::Quit];
                }
                KeyCode::Char('q') | KeyCode::Esc => return vec![Action::Quit],
                KeyCode::Char('r') | KeyCode::F(5) if state.can_refresh() => {
                    return vec![Action::RefreshStart(RefreshTrigger::Manual)];
                }
                _ => {}
            }
        }

        let Some(payload) = state.view.payload() else {
            return vec![];
        };
        if let EventKind::Mouse(_) = event {
            let processed_at = payload.processed_at_local();
            let clicked = self
                .header
                .handle_event(event, header_props(state, &processed_at));
            if !clicked.is_empty() {
                return clicked;
            }
        }
        self.table.handle_event(event, table_props(state, payload))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: DashboardViewProps<'_>) {
        let state = props.state;

        let outer_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
            .title(format!(" {TITLE} "))
            .title_style(Style::default().fg(Color::Cyan).bold())
            .title_alignment(Alignment::Center);

        frame.render_widget(outer_block.clone(), area);
        let inner = outer_block.inner(area);

        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]);
        let [body, help] = rows.areas(inner);

        let mut can_scroll = false;
        match &state.view {
            View::Loading => {
                self.header.clear();
                let props = StatusPanelProps::Loading {
                    tick_count: state.tick_count,
                };
                StatusPanel.render(frame, body, props);
            }
            View::Error => {
                self.header.clear();
                let props = StatusPanelProps::Error {
                    is_refreshing: state.is_refreshing,
                    tick_count: state.tick_count,
                };
                StatusPanel.render(frame, body, props);
            }
            View::Ready(payload) => {
                let [header, _, table] = Layout::vertical([
                    Constraint::Length(HeaderBar::HEIGHT),
                    Constraint::Length(1),
                    Constraint::Min(1),
                ])
                .areas(body);

                let processed_at = payload.processed_at_local();
                self.header
                    .render(frame, header, header_props(state, &processed_at));
                self.table.render(frame, table, table_props(state, payload));
                can_scroll = self.table.max_offset(payload.result.len()) > 0;
            }
        }

        let props = HelpBarProps {
            can_refresh: state.can_refresh(),
            can_scroll,
        };
        HelpBar.render(frame, help, props);
    }
}

fn header_props<'a>(state: &'a DashboardState, processed_at: &'a str) -> HeaderBarProps<'a> {
    let payload = state.view.payload();
    HeaderBarProps {
        processed_at,
        model: payload.and_then(|p| p.model.as_deref()),
        source: payload.and_then(|p| p.source.as_deref()),
        is_refreshing: state.is_refreshing,
        can_refresh: state.can_refresh(),
    }
}

fn table_props<'a>(state: &DashboardState, payload: &'a WeatherPayload) -> WeatherTableProps<'a> {
    WeatherTableProps {
        cities: &payload.result,
        offset: state.table_offset,
    }
}
