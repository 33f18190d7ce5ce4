//! HTTP surface: cookie handling and route handlers

pub mod cookies;
pub mod handlers;
