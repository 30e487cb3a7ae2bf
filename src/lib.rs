//! Cleans the Our World in Data COVID-19 table for a handful of countries,
//! derives death rate and vaccination coverage, and summarizes the latest day.

pub mod aggregate;
pub mod charts;
pub mod clean;
pub mod cli;
pub mod config;
pub mod eda;
pub mod eda_statistics;
pub mod error;
pub mod load_clean;
pub mod metrics;
pub mod models;
pub mod pipeline;
