//! City table with a scrollable body
//!
//! - `j` / `Down`, `k` / `Up`: one row
//! - `PageDown` / `PageUp`: one page
//! - `g` / `Home`, `G` / `End`: first or last page
//! - mouse wheel: three rows
//!
//! When the rows do not fit, the last line shows which slice is in view.

use crossterm::event::{KeyCode, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Cell, Paragraph, Row, Table, TableState},
};
use skyboard_core::EventKind;

use super::Component;
use crate::action::Action;
use crate::payload::CityTable;

const CITY_MIN_WIDTH: u16 = 8;
const MOOD_MIN_WIDTH: u16 = 8;
/// Column titles plus the margin under them
const HEADER_HEIGHT: u16 = 2;
const WHEEL_ROWS: usize = 3;

/// Remembers how many rows fit in the last render, for paging.
#[derive(Default)]
pub struct WeatherTable {
    page_size: usize,
}

pub struct WeatherTableProps<'a> {
    pub cities: &'a CityTable,
    /// First row in view, as kept in state
    pub offset: usize,
}

impl WeatherTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows visible at once in the last render.
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Largest first row that still fills the viewport.
    pub fn max_offset(&self, rows: usize) -> usize {
        rows.saturating_sub(self.page_size())
    }
}

impl Component<Action> for WeatherTable {
    type Props<'a> = WeatherTableProps<'a>;

    fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>) -> Vec<Action> {
        let max = self.max_offset(props.cities.len());
        let current = props.offset.min(max);
        let page = self.page_size();

        let target = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('j') | KeyCode::Down => current + 1,
                KeyCode::Char('k') | KeyCode::Up => current.saturating_sub(1),
                KeyCode::PageDown => current + page,
                KeyCode::PageUp => current.saturating_sub(page),
                KeyCode::Char('g') | KeyCode::Home => 0,
                KeyCode::Char('G') | KeyCode::End => max,
                _ => return vec![],
            },
            EventKind::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => current + WHEEL_ROWS,
                MouseEventKind::ScrollUp => current.saturating_sub(WHEEL_ROWS),
                _ => return vec![],
            },
            _ => return vec![],
        };

        let target = target.min(max);
        if target == current {
            vec![]
        } else {
            vec![Action::UiTableScroll(target)]
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let total = props.cities.len();
        let fits = area.height.saturating_sub(HEADER_HEIGHT) as usize;
        let (table_area, hint_area) = if total > fits && area.height > HEADER_HEIGHT + 1 {
            let layout = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]);
            let [table, hint] = layout.areas(area);
            (table, Some(hint))
        } else {
            (area, None)
        };
        self.page_size = table_area.height.saturating_sub(HEADER_HEIGHT) as usize;
        let offset = props.offset.min(self.max_offset(total));

        let header = Row::new(["City", "Mood", "Description"])
            .style(Style::default().fg(Color::Cyan).bold())
            .bottom_margin(1);

        let city_style = Style::default().fg(Color::White).bold();
        let summary_style = Style::default().fg(Color::Gray);
        let mut city_width = CITY_MIN_WIDTH;
        let mut mood_width = MOOD_MIN_WIDTH;
        let rows: Vec<Row> = props
            .cities
            .iter()
            .map(|(city, weather)| {
                city_width = city_width.max(city.chars().count() as u16);
                mood_width = mood_width.max(weather.mood.chars().count() as u16);
                let mood = mood_style(&weather.mood_key());
                Row::new([
                    Cell::from(city).style(city_style),
                    Cell::from(weather.mood.as_str()).style(mood),
                    Cell::from(weather.summary.as_str()).style(summary_style),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(city_width),
            Constraint::Length(mood_width),
            Constraint::Min(10),
        ];
        let table = Table::new(rows, widths).header(header).column_spacing(2);
        let mut state = TableState::default().with_offset(offset);
        frame.render_stateful_widget(table, table_area, &mut state);

        if let Some(hint) = hint_area {
            let last = (offset + self.page_size()).min(total);
            let text = format!("rows {}-{last} of {total} ", offset + 1);
            let line = Line::styled(text, Style::default().fg(Color::DarkGray));
            frame.render_widget(Paragraph::new(line.right_aligned()), hint);
        }
    }
}

/// Style for a lowercased mood label. Unknown moods render plain.
pub fn mood_style(mood: &str) -> Style {
    let color = match mood {
        "sunny" | "clear" | "bright" | "hot" | "warm" => Color::Yellow,
        "calm" | "pleasant" | "mild" | "breezy" => Color::Green,
        "rainy" | "stormy" | "wet" | "drizzly" | "gloomy" => Color::Blue,
        "cloudy" | "foggy" | "hazy" | "overcast" | "misty" => Color::Gray,
        "cold" | "chilly" | "snowy" | "freezing" | "icy" => Color::Cyan,
        "humid" | "windy" | "muggy" => Color::Magenta,
        _ => return Style::default(),
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
