//! Object storage for image attachments.

mod s3;

use std::future::Future;

use crate::Result;

pub use s3::S3Storage;

/// Key/value object store that can hand out fetchable URLs.
pub trait ObjectStorage {
    /// Resolve `key` to a URL a browser or HTTP client can fetch.
    fn get_url(&self, key: &str) -> impl Future<Output = Result<String>> + Send;

    /// Store `bytes` under `key`.
    fn put(
        &self,
        key: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Guess a MIME type from a file name or key.
pub fn guess_content_type(file_name: &str) -> Option<String> {
    mime_guess::from_path(file_name)
        .first_raw()
        .map(ToOwned::to_owned)
}
