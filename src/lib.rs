//! A two-day rolling activity log.
//!
//! Producers submit events (type, title, text, optional image). The service
//! keeps them in two buckets, `today` and `yesterday`, migrates `today` into
//! `yesterday` when the local date changes, caps `today` at a fixed number of
//! events, and persists both buckets to a JSON file after every change.

pub mod api;
pub mod capture;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
