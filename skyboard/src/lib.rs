//! Terminal dashboard for AI-generated weather insights
//!
//! Polls one endpoint for the latest processed weather summary and shows it
//! as a City / Mood / Description table. The data refreshes on start, every
//! ten minutes, and on demand.
//!
//! - [`api`]: HTTP fetcher behind the [`api::WeatherSource`] trait
//! - [`payload`]: decoding of the response envelope
//! - [`state`], [`action`], [`reducer`], [`effect`]: the store
//! - [`controller`]: refresh scheduling and the fetch cycle
//! - [`components`], [`app`]: rendering and input

pub mod action;
pub mod api;
pub mod app;
pub mod components;
pub mod config;
pub mod controller;
pub mod effect;
pub mod logging;
pub mod payload;
pub mod reducer;
pub mod state;
