//! HTTP API layer
//!
//! RESTful endpoints under `/api`, all bearer-token authenticated except the
//! health check. The chat endpoint streams server-sent events; everything
//! else is JSON request/response.

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;
