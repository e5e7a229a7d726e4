//! Comparative military statistics: a static country table and the chart-ready views and
//! synthetic equipment estimates derived from it, served over a small JSON API and a CLI.

pub mod cli;
pub mod config;
pub mod data;
pub mod estimate;
pub mod server;
pub mod views;
