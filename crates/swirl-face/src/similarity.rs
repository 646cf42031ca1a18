use swirl_image::Image;
use swirl_imgproc::{
    color::gray_from_rgb_u8,
    histogram::{
        compare_histograms, compute_histogram, normalize_histogram, HistogramComparison,
        HistogramNorm,
    },
};

use crate::{errors::FaceError, region::FaceRegion};

/// Score above which two faces are considered to show the same subject.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Scores how alike two face images are, higher is more similar.
pub trait SimilarityScorer {
    /// Score the pair `(a, b)`.
    fn score(&self, a: &Image<u8, 3>, b: &Image<u8, 3>) -> Result<f64, FaceError>;
}

/// Plane of the image the histogram is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistogramChannel {
    /// BT.601 luma.
    #[default]
    Luma,
    /// Red channel.
    Red,
    /// Green channel.
    Green,
    /// Blue channel.
    Blue,
}

/// Pearson correlation of unit L2 normalized intensity histograms.
///
/// The score lies in `[-1, 1]` and is symmetric. An image compared with
/// itself scores `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramCorrelation {
    /// Number of bins over `[0, 256)`, at most 256.
    pub num_bins: usize,
    /// Plane the histogram is computed on.
    pub channel: HistogramChannel,
}

impl Default for HistogramCorrelation {
    fn default() -> Self {
        Self {
            num_bins: 256,
            channel: HistogramChannel::default(),
        }
    }
}

impl HistogramCorrelation {
    /// A 256 bin scorer on the given plane.
    pub fn new(channel: HistogramChannel) -> Self {
        Self {
            channel,
            ..Default::default()
        }
    }

    /// Unit L2 normalized histogram of the selected plane.
    pub fn histogram(&self, image: &Image<u8, 3>) -> Result<Vec<f64>, FaceError> {
        let plane = match self.channel {
            HistogramChannel::Luma => {
                let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0)?;
                gray_from_rgb_u8(image, &mut gray)?;
                gray
            }
            HistogramChannel::Red => image.channel(0)?,
            HistogramChannel::Green => image.channel(1)?,
            HistogramChannel::Blue => image.channel(2)?,
        };

        let mut hist = vec![0; self.num_bins];
        compute_histogram(&plane, &mut hist, self.num_bins)?;

        Ok(normalize_histogram(&hist, HistogramNorm::L2))
    }
}

impl SimilarityScorer for HistogramCorrelation {
    fn score(&self, a: &Image<u8, 3>, b: &Image<u8, 3>) -> Result<f64, FaceError> {
        let (ha, hb) = (self.histogram(a)?, self.histogram(b)?);
        Ok(compare_histograms(&ha, &hb, HistogramComparison::Correlation)?)
    }
}

/// Outcome of a face comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The score is above the threshold.
    SameSubject,
    /// The score is at or below the threshold.
    DifferentSubjects,
}

/// Score and verdict of a face comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceMatch {
    /// The similarity score.
    pub score: f64,
    /// The verdict for the threshold used.
    pub verdict: Verdict,
}

/// Compare two face regions.
///
/// The faces show the same subject when the score is strictly above `threshold`.
///
/// # Arguments
///
/// * `scorer` - The similarity measure.
/// * `a` - The reference face.
/// * `b` - The face under test.
/// * `threshold` - Decision threshold, usually [`DEFAULT_SIMILARITY_THRESHOLD`].
pub fn compare_faces<S: SimilarityScorer + ?Sized>(
    scorer: &S,
    a: &FaceRegion,
    b: &FaceRegion,
    threshold: f64,
) -> Result<FaceMatch, FaceError> {
    let score = scorer.score(&a.image, &b.image)?;
    let verdict = if score > threshold {
        Verdict::SameSubject
    } else {
        Verdict::DifferentSubjects
    };

    log::debug!("similarity score {score:.4} against threshold {threshold}: {verdict:?}");

    Ok(FaceMatch { score, verdict })
}
