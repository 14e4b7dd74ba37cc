//! Eventscout - Event Recommendation System
//!
//! Content-based event recommendations over a tabular catalog: describe the kind of
//! event you want, narrow the results with filters, and open any event for its
//! details, a map and directions.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod detail;
pub mod display;
pub mod engine;
pub mod error;
pub mod filters;
pub mod recommender;
pub mod retrieval;
pub mod session;
pub mod shell;
pub mod similarity;
pub mod vectorizer;
pub mod views;

pub use error::{Error, Result};
