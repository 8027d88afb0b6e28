//! Central module for organizing the application's main API endpoints.
//!
//! This module acts as a top-level container for API domains beyond the core
//! authentication routes, which are handled separately.

pub mod user;
