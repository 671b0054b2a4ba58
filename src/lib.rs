//! Live dashboard client for an external AI trading backend.
//!
//! Keeps a local copy of the backend's portfolio, trades, history and AI
//! decisions in step through periodic REST polling plus a WebSocket push
//! channel, and derives the figures the dashboard displays.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod task_runner;
