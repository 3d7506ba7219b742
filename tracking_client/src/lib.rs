use std::fmt;

use const_format::concatcp;

pub mod cache;
pub mod config;
pub mod directions;
pub mod map;
pub mod realtime;
mod tracking_view;

pub use tracking_view::*;

pub const DATA_DIR: &str = "data/";
pub const POSITION_CACHE_DIR: &str = concatcp!(DATA_DIR, "position_cache");
pub const LOG_DIR: &str = concatcp!(DATA_DIR, "log");
pub const LOG_FILE: &str = concatcp!(LOG_DIR, "/tracking_client.log");

#[derive(Debug, Clone, PartialEq)]
pub enum TrackingError {
    Cache(String),
    Directions(String),
    Subscription(String),
    Payload(String),
    Config(String),
}

impl fmt::Display for TrackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingError::Cache(msg) => write!(f, "cache error: {msg}"),
            TrackingError::Directions(msg) => write!(f, "directions error: {msg}"),
            TrackingError::Subscription(msg) => write!(f, "subscription error: {msg}"),
            TrackingError::Payload(msg) => write!(f, "malformed payload: {msg}"),
            TrackingError::Config(msg) => write!(f, "configuration error: {msg}"),
        }
    }
}

impl std::error::Error for TrackingError {}
