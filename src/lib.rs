//! Command-line client for the Trakt media tracking API.

pub mod api;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod episode;
pub mod logging;
pub mod output;
