//! Resize/cache collaborator contract.
//!
//! The production implementation is
//! [`PresetResizer`](super::preset_resizer::PresetResizer). Storefronts with
//! their own image service implement [`ImageResizer`] over it.

use crate::types::Product;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("unknown image preset: {0}")]
    UnknownPreset(String),
    #[error("unrecognized image reference: {0:?}")]
    InvalidReference(String),
    #[error("resize service failed: {0}")]
    Service(String),
}

/// Builds a servable, resized URL for a stored image.
pub trait ImageResizer: Sync {
    /// URL of `file` rendered for `preset` in the context of `product`.
    fn build_url(&self, product: &Product, preset: &str, file: &str)
    -> Result<String, ResizeError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// A resize request the mock received.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedRequest {
        pub sku: String,
        pub preset: String,
        pub file: String,
    }

    /// Mock resizer that records requests and answers from a fixed rule.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockResizer {
        /// Files for which the mock fails.
        pub failing: Vec<String>,
        pub requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockResizer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_for(files: &[&str]) -> Self {
            Self {
                failing: files.iter().map(|f| f.to_string()).collect(),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn get_requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl ImageResizer for MockResizer {
        fn build_url(
            &self,
            product: &Product,
            preset: &str,
            file: &str,
        ) -> Result<String, ResizeError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                sku: product.sku.clone(),
                preset: preset.to_string(),
                file: file.to_string(),
            });
            if self.failing.iter().any(|f| f == file) {
                return Err(ResizeError::Service("mock failure".into()));
            }
            Ok(format!("https://cdn.test/{preset}{file}"))
        }
    }

    #[test]
    fn mock_records_requests() {
        let resizer = MockResizer::new();
        let product = Product {
            sku: "MJ01".into(),
            ..Default::default()
        };
        let url = resizer
            .build_url(&product, "category_page_list", "/a.jpg")
            .unwrap();
        assert_eq!(url, "https://cdn.test/category_page_list/a.jpg");
        assert_eq!(
            resizer.get_requests(),
            vec![RecordedRequest {
                sku: "MJ01".into(),
                preset: "category_page_list".into(),
                file: "/a.jpg".into(),
            }]
        );
    }

    #[test]
    fn mock_fails_for_configured_files() {
        let resizer = MockResizer::failing_for(&["/broken.jpg"]);
        assert!(
            resizer
                .build_url(&Product::default(), "p", "/broken.jpg")
                .is_err()
        );
    }
}
