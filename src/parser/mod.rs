//! Request decoding: base64 payload handling and MIME parsing.

pub mod mime;
pub mod payload;
