//! `mailfiler` — files emailed course materials into per-course storage folders.
//!
//! A request carries a base64-encoded email. The subject names the top-level
//! folder, and each attachment whose filename contains a routing keyword
//! (`lecture`, `hw`, `written assignment`) is written to
//! `{subject}/{keyword folder}/{filename}` in the destination bucket.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod router;
pub mod store;

pub use router::EmailAttachmentRouter;
