//! HTTP route handlers.

pub mod front;
pub mod language;
