//! Linklet - URL shortening service core
//!
//! This library provides the building blocks for the Linklet service:
//! code allocation, redirect resolution, click tracking, and analytics.
//!
//! # Architecture
//! - `api`: HTTP handlers and route registration
//! - `cache`: Resolution cache in front of the link store
//! - `config`: Environment-driven configuration
//! - `services`: Business logic (allocation, redirect, clicks, analytics)
//! - `storage`: Link and click-event stores
//! - `utils`: IP handling and URL validation

pub mod api;
pub mod cache;
pub mod config;
pub mod errors;
pub mod logging;
pub mod services;
pub mod storage;
pub mod utils;
