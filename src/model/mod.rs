//! Core data model types: parsed messages, keyword rules, and the request/response envelope.

pub mod event;
pub mod message;
pub mod rule;
