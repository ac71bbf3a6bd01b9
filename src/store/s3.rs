use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;
use s3::Bucket;
use tokio::runtime::Runtime;

use super::{ObjectStore, StoreError};
use crate::config::StorageConfig;

/// Region used when neither the config nor the endpoint names one.
const DEFAULT_REGION: &str = "us-east-1";

/// S3-compatible object store (AWS, MinIO, Garage).
///
/// The bucket is chosen per write, so one store serves whatever bucket the
/// router was configured with. Uploads run on a private current-thread
/// runtime and block the caller.
pub struct S3Store {
    region: Region,
    credentials: Credentials,
    path_style: bool,
    runtime: Runtime,
}

impl std::fmt::Debug for S3Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Store")
            .field("region", &self.region)
            .field("path_style", &self.path_style)
            .finish_non_exhaustive()
    }
}

impl S3Store {
    /// Build a store from the `[storage]` section. Missing credentials are
    /// looked up in the environment and the AWS profile.
    pub fn new(config: &StorageConfig) -> Result<Self, StoreError> {
        let region_name = config
            .region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let endpoint = config
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{region_name}.amazonaws.com"));
        let region = Region::Custom {
            region: region_name,
            endpoint,
        };

        let credentials = Credentials::new(
            config.access_key_id.as_deref(),
            config.secret_access_key.as_deref(),
            None,
            None,
            None,
        )
        .map_err(|e| StoreError::Internal(format!("credentials: {e}")))?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Internal(format!("runtime: {e}")))?;

        Ok(Self {
            region,
            credentials,
            path_style: config.path_style,
            runtime,
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StoreError> {
        let mut bucket = Bucket::new(name, self.region.clone(), self.credentials.clone())
            .map_err(|e| StoreError::Internal(format!("bucket '{name}': {e}")))?;
        if self.path_style {
            bucket.set_path_style();
        }
        Ok(bucket)
    }
}

fn content_type_for_key(key: &str) -> &'static str {
    let ext = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "zip" => "application/zip",
        "txt" => "text/plain",
        "md" => "text/markdown",
        _ => "application/octet-stream",
    }
}

fn map_s3_error(e: S3Error) -> StoreError {
    StoreError::Internal(format!("s3: {e}"))
}

impl ObjectStore for S3Store {
    fn put(&self, bucket: &str, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let handle = self.bucket(bucket)?;
        let content_type = content_type_for_key(key);
        let response = self
            .runtime
            .block_on(handle.put_object_with_content_type(key, data, content_type))
            .map_err(map_s3_error)?;
        if response.status_code() >= 300 {
            return Err(StoreError::Internal(format!(
                "s3 put {bucket}/{key}: status {}",
                response.status_code()
            )));
        }
        tracing::debug!(bucket, key, content_type, "Stored object in S3");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn garage_config() -> StorageConfig {
        StorageConfig {
            endpoint: Some("http://localhost:3900".into()),
            region: Some("garage".into()),
            access_key_id: Some("key".into()),
            secret_access_key: Some("secret".into()),
            path_style: true,
            ..StorageConfig::default()
        }
    }

    #[test]
    fn test_bucket_comes_from_each_write() {
        let store = S3Store::new(&garage_config()).unwrap();
        let courses = store.bucket("course-materials").unwrap();
        assert_eq!(courses.name(), "course-materials");
        assert_eq!(courses.url(), "http://localhost:3900/course-materials");

        let other = store.bucket("archive").unwrap();
        assert_eq!(other.name(), "archive");
    }

    #[test]
    fn test_region_and_endpoint() {
        let store = S3Store::new(&garage_config()).unwrap();
        assert_eq!(
            store.region,
            Region::Custom {
                region: "garage".into(),
                endpoint: "http://localhost:3900".into(),
            }
        );

        let aws = StorageConfig {
            region: Some("eu-west-1".into()),
            access_key_id: Some("key".into()),
            secret_access_key: Some("secret".into()),
            ..StorageConfig::default()
        };
        let store = S3Store::new(&aws).unwrap();
        assert_eq!(
            store.region,
            Region::Custom {
                region: "eu-west-1".into(),
                endpoint: "https://s3.eu-west-1.amazonaws.com".into(),
            }
        );
        assert!(!store.path_style);
    }

    #[test]
    fn test_content_type_detection() {
        assert_eq!(
            content_type_for_key("CS260/hw/HW3_solutions.pdf"),
            "application/pdf"
        );
        assert_eq!(
            content_type_for_key("CS101/lecture/Lecture01.PPTX"),
            "application/vnd.openxmlformats-officedocument.presentationml.presentation"
        );
        assert_eq!(content_type_for_key("CS260/hw/hw2.zip"), "application/zip");
        assert_eq!(
            content_type_for_key("CS260/hw/README"),
            "application/octet-stream"
        );
    }

    // Needs a running S3-compatible service; set MAILFILER_S3_ENDPOINT to run.
    #[test]
    #[ignore]
    fn test_put_against_live_endpoint() {
        let endpoint = std::env::var("MAILFILER_S3_ENDPOINT").expect("MAILFILER_S3_ENDPOINT");
        let config = StorageConfig {
            endpoint: Some(endpoint),
            path_style: true,
            ..StorageConfig::default()
        };
        let store = S3Store::new(&config).unwrap();
        store
            .put("mailfiler-test", "CS260/hw/HW1.pdf", b"%PDF-1.4")
            .unwrap();
    }
}
