//! Parsed email messages and their attachment parts.

use mail_parser::{Message, MessagePart, MimeHeaders};

/// A parsed email, built once per invocation from the decoded request bytes.
///
/// Borrows the raw buffer it was parsed from and is consumed by
/// [`EmailMessage::into_attachments`].
pub struct EmailMessage<'x> {
    inner: Message<'x>,
}

/// One attachment of an [`EmailMessage`].
///
/// Owns the parsed MIME part; the content is only read through
/// [`AttachmentPart::payload`].
#[derive(Debug)]
pub struct AttachmentPart<'x> {
    /// Filename from `Content-Disposition`, falling back to the `Content-Type` `name`.
    /// An empty name is `None`.
    pub filename: Option<String>,
    part: MessagePart<'x>,
}

impl<'x> AttachmentPart<'x> {
    fn new(part: MessagePart<'x>) -> Self {
        Self {
            filename: part
                .attachment_name()
                .filter(|name| !name.is_empty())
                .map(String::from),
            part,
        }
    }

    /// Content with the part's transfer encoding removed.
    pub fn payload(&self) -> &[u8] {
        self.part.contents()
    }
}

impl<'x> EmailMessage<'x> {
    pub(crate) fn new(inner: Message<'x>) -> Self {
        Self { inner }
    }

    /// The decoded `Subject` header, if present.
    pub fn subject(&self) -> Option<&str> {
        self.inner.subject()
    }

    /// Number of attachment-bearing parts (inline body parts excluded).
    pub fn attachment_count(&self) -> usize {
        self.inner.attachment_count()
    }

    /// Consume the message, yielding its attachments in the order they appear.
    pub fn into_attachments(self) -> Attachments<'x> {
        let Message {
            parts, attachments, ..
        } = self.inner;
        Attachments {
            parts: parts.into_iter().map(Some).collect(),
            ids: attachments.into_iter(),
        }
    }
}

/// Single-pass iterator over the attachments of a message.
///
/// Each part is moved out of the message as it is yielded, so no content is
/// copied.
pub struct Attachments<'x> {
    parts: Vec<Option<MessagePart<'x>>>,
    ids: std::vec::IntoIter<usize>,
}

impl<'x> Iterator for Attachments<'x> {
    type Item = AttachmentPart<'x>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let id = self.ids.next()?;
            if let Some(part) = self.parts.get_mut(id).and_then(Option::take) {
                return Some(AttachmentPart::new(part));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.ids.len()))
    }
}

impl std::fmt::Debug for EmailMessage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailMessage")
            .field("subject", &self.subject())
            .field("attachments", &self.attachment_count())
            .finish()
    }
}
