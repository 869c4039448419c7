//! Text extraction boundary.
//!
//! The recognition engine is an external capability; the pipeline only
//! consumes its output through [`TextExtractor`].

#[cfg(feature = "native")]
mod pure_engine;

#[cfg(feature = "native")]
pub use pure_engine::PureTextExtractor;

use std::future::Future;

use image::DynamicImage;

use crate::error::ExtractionError;

/// Adapter over an optical text recognition capability.
///
/// `extract` consumes an ordered batch of images and yields the recognized
/// text lines of each image, concatenated in batch order. Extraction is the
/// pipeline's one long-running stage; implementations run the engine off
/// the caller's task (a background worker) and only suspend the caller.
pub trait TextExtractor: Send + Sync {
    /// Recognize text in `images`.
    fn extract(
        &self,
        images: Vec<DynamicImage>,
    ) -> impl Future<Output = Result<String, ExtractionError>> + Send;
}
