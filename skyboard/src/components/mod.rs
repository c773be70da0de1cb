pub mod dashboard_view;
pub mod header_bar;
pub mod help_bar;
pub mod status_panel;
pub mod weather_table;

pub use skyboard_core::Component;

pub use dashboard_view::{DashboardView, DashboardViewProps, TITLE};
pub use header_bar::{HeaderBar, HeaderBarProps, REFRESH_LABEL, REFRESHING_LABEL};
pub use help_bar::{HelpBar, HelpBarProps};
pub use status_panel::{ERROR_TEXT, LOADING_TEXT, SPINNERS, StatusPanel, StatusPanelProps};
pub use weather_table::{WeatherTable, WeatherTableProps, mood_style};
