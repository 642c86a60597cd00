//! Cancel Checker - Social media content risk analysis
//!
//! This crate scores how likely a post, page or document is to draw public
//! backlash. Text is normalized, sent once to an OpenAI-compatible completion
//! API for per-category sub-scores, and aggregated locally into a weighted
//! risk percentage and level.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
