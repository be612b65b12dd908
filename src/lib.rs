pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod history;
pub mod logging;
pub mod sentiment;
pub mod web;
