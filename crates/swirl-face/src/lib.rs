#![deny(missing_docs)]
//! # Swirl Face
//!
//! Locate faces with an OpenCV Haar cascade and compare them with an
//! intensity histogram correlation.
//!
//! ```no_run
//! use swirl_face::{
//!     compare_faces, detect_face, CascadeDetector, CascadeDetectorConfig, HistogramCorrelation,
//!     DEFAULT_SIMILARITY_THRESHOLD,
//! };
//! # fn run(a: &swirl_image::Image<u8, 3>, b: &swirl_image::Image<u8, 3>) -> Result<(), swirl_face::FaceError> {
//! let detector = CascadeDetector::from_file(
//!     "haarcascade_frontalface_default.xml",
//!     CascadeDetectorConfig::default(),
//! )?;
//!
//! let target = [287, 392].into();
//! if let (Some(fa), Some(fb)) = (detect_face(&detector, a, target)?, detect_face(&detector, b, target)?) {
//!     let result = compare_faces(&HistogramCorrelation::default(), &fa, &fb, DEFAULT_SIMILARITY_THRESHOLD)?;
//!     println!("{:.3} {:?}", result.score, result.verdict);
//! }
//! # Ok(())
//! # }
//! ```

use swirl_image::{Image, ImageSize};

/// Haar cascade model and its evaluation.
pub mod cascade;

/// Multi-scale sliding window detector.
pub mod detector;

/// Error types for face location and comparison.
pub mod errors;

/// Clustering of overlapping detections.
pub mod group;

/// Summed area tables.
pub mod integral;

/// Face rectangles and extracted face regions.
pub mod region;

/// Face similarity scoring.
pub mod similarity;

pub use crate::cascade::HaarCascade;
pub use crate::detector::{CascadeDetector, CascadeDetectorConfig};
pub use crate::errors::{CascadeError, FaceError};
pub use crate::region::{FaceRect, FaceRegion, DEFAULT_REGION_HEIGHT, DEFAULT_REGION_WIDTH};
pub use crate::similarity::{
    compare_faces, FaceMatch, HistogramChannel, HistogramCorrelation, SimilarityScorer, Verdict,
    DEFAULT_SIMILARITY_THRESHOLD,
};

/// Finds faces in an RGB image.
pub trait FaceLocator {
    /// Locate the faces in `image`, largest first. An empty list means no face.
    fn locate(&self, image: &Image<u8, 3>) -> Result<Vec<FaceRect>, FaceError>;
}

/// Locate the most prominent face and extract it at the `target` size.
///
/// Returns `Ok(None)` when the locator finds no face.
pub fn detect_face<L: FaceLocator + ?Sized>(
    locator: &L,
    image: &Image<u8, 3>,
    target: ImageSize,
) -> Result<Option<FaceRegion>, FaceError> {
    let faces = locator.locate(image)?;

    let Some(rect) = faces.first() else {
        log::debug!("no face located in a {} image", image.size());
        return Ok(None);
    };

    log::debug!("{} faces located, keeping {:?}", faces.len(), rect);

    FaceRegion::extract(image, rect, target).map(Some)
}
