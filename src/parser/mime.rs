//! MIME message parsing and subject extraction.

use mail_parser::MessageParser;

use crate::error::{Result, RouteError};
use crate::model::message::EmailMessage;

/// Parse decoded bytes into an [`EmailMessage`].
///
/// A leading BOM or MBOX `From ` separator line is skipped. Input that yields
/// no headers at all is rejected as [`RouteError::Parse`].
pub fn parse_message(raw: &[u8]) -> Result<EmailMessage<'_>> {
    let message_bytes = skip_from_line(raw);
    if message_bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(RouteError::Parse("message is empty".into()));
    }

    let msg = MessageParser::default()
        .parse(message_bytes)
        .ok_or_else(|| RouteError::Parse("not an RFC 5322 message".into()))?;

    let has_headers = msg.parts.first().is_some_and(|root| !root.headers.is_empty());
    if !has_headers {
        return Err(RouteError::Parse("message has no headers".into()));
    }

    Ok(EmailMessage::new(msg))
}

/// Return the trimmed subject, used verbatim as the top-level folder name.
pub fn subject_folder(message: &EmailMessage<'_>) -> Result<String> {
    match message.subject().map(str::trim) {
        Some(subject) if !subject.is_empty() => Ok(subject.to_string()),
        _ => Err(RouteError::MissingSubject),
    }
}

/// Skip a leading BOM and MBOX `From ` separator line, if present.
fn skip_from_line(data: &[u8]) -> &[u8] {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}
