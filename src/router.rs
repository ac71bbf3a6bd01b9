//! The attachment router: decodes an emailed request and files each
//! attachment under `{subject}/{subfolder}/{filename}` in the destination bucket.

use humansize::{format_size, BINARY};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::model::event::{RouteRequest, RouteResponse};
use crate::model::message::AttachmentPart;
use crate::model::rule::KeywordTable;
use crate::parser::{mime, payload};
use crate::store::ObjectStore;

/// Routes email attachments into an object store.
///
/// The store, bucket, and keyword table are fixed at construction and only
/// read afterwards, so one router serves any number of independent requests.
pub struct EmailAttachmentRouter<S> {
    store: S,
    bucket: String,
    rules: KeywordTable,
}

impl<S: ObjectStore> EmailAttachmentRouter<S> {
    /// Router with the built-in keyword table.
    pub fn new(store: S, bucket: impl Into<String>) -> Self {
        Self::with_rules(store, bucket, KeywordTable::default())
    }

    pub fn with_rules(store: S, bucket: impl Into<String>, rules: KeywordTable) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            rules,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one request. Never fails: request-level problems become an
    /// error response, and per-attachment write failures are logged and
    /// left out of `uploaded_files`.
    pub fn route(&self, request: &RouteRequest) -> RouteResponse {
        match self.route_inner(request) {
            Ok(uploaded_files) => {
                info!(count = uploaded_files.len(), "Finished routing email");
                RouteResponse::Success { uploaded_files }
            }
            Err(e) => {
                warn!(error = %e, "Rejected email");
                e.into()
            }
        }
    }

    fn route_inner(&self, request: &RouteRequest) -> Result<Vec<String>> {
        let raw = payload::decode_content(request.content.as_ref())?;
        let message = mime::parse_message(&raw)?;
        let subject = mime::subject_folder(&message)?;
        debug!(
            subject = %subject,
            attachments = message.attachment_count(),
            "Parsed email"
        );

        let uploaded = message
            .into_attachments()
            .filter_map(|part| self.route_attachment(&subject, part))
            .collect();
        Ok(uploaded)
    }

    /// File a single attachment. Returns the destination key if it was written.
    fn route_attachment(&self, subject: &str, part: AttachmentPart<'_>) -> Option<String> {
        let Some(filename) = part.filename.as_deref() else {
            debug!("Skipping attachment without a filename");
            return None;
        };

        let Some(folder) = self.rules.classify(filename) else {
            info!(
                filename = %filename,
                "Attachment {filename} did not match any expected keywords"
            );
            return None;
        };

        let key = destination_key(subject, folder, filename);
        let payload = part.payload();
        match self.store.put(&self.bucket, &key, payload) {
            Ok(()) => {
                info!(
                    filename = %filename,
                    bucket = %self.bucket,
                    key = %key,
                    size = %format_size(payload.len(), BINARY),
                    "Uploaded {filename} to {}/{key}",
                    self.bucket
                );
                Some(key)
            }
            Err(e) => {
                warn!(filename = %filename, key = %key, error = %e, "Failed to upload attachment");
                None
            }
        }
    }
}

/// Build the destination key `{subject}/{folder}/{filename}`.
///
/// Segments are used verbatim: a subject or filename containing `/` or `..`
/// is not rewritten here.
pub fn destination_key(subject: &str, folder: &str, filename: &str) -> String {
    format!("{subject}/{folder}/{filename}")
}
