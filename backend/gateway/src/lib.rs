//! markscan Gateway HTTP Server
//!
//! Serves the single-page upload UI and the JSON analysis API.

pub mod attachments;
pub mod control_ui;
pub mod health_api;
pub mod server;

pub use server::{build_router, start_server, GatewayState};
