use rayon::prelude::*;
use swirl_image::{Image, ImageError};

/// Compute the pixel intensity histogram of an image.
///
/// NOTE: this is limited to 8-bit 1-channel images.
///
/// # Arguments
///
/// * `src` - The input image to compute the histogram.
/// * `hist` - The output histogram, counts are accumulated into it.
/// * `num_bins` - The number of bins to use for the histogram.
///
/// # Errors
///
/// Returns an error if the number of bins is invalid.
///
/// # Example
///
/// ```
/// use swirl_image::{Image, ImageSize};
/// use swirl_imgproc::histogram::compute_histogram;
///
/// let image = Image::<u8, 1>::new(
///   ImageSize {
///     width: 3,
///     height: 3,
///   },
///   vec![0, 2, 4, 128, 130, 132, 254, 255, 255],
/// ).unwrap();
///
/// let mut histogram = vec![0; 3];
///
/// compute_histogram(&image, &mut histogram, 3).unwrap();
/// assert_eq!(histogram, vec![3, 3, 3]);
/// ```
pub fn compute_histogram(
    src: &Image<u8, 1>,
    hist: &mut [usize],
    num_bins: usize,
) -> Result<(), ImageError> {
    if num_bins == 0 || num_bins > 256 || hist.len() != num_bins {
        return Err(ImageError::InvalidHistogramBins(num_bins));
    }

    let mut bin_lut = [0usize; 256];
    for (i, bin) in bin_lut.iter_mut().enumerate() {
        *bin = (i * num_bins) >> 8;
    }

    let counts = src
        .as_slice()
        .par_chunks(4096)
        .fold(
            || vec![0usize; num_bins],
            |mut local, chunk| {
                for &px in chunk {
                    local[bin_lut[px as usize]] += 1;
                }
                local
            },
        )
        .reduce(
            || vec![0usize; num_bins],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                a
            },
        );

    hist.iter_mut().zip(counts).for_each(|(h, c)| *h += c);

    Ok(())
}

/// Norm used to normalize a histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistogramNorm {
    /// Scale so that the bins sum to one.
    L1,
    /// Scale so that the euclidean norm of the bins is one.
    #[default]
    L2,
    /// Scale so that the largest bin is one.
    Inf,
}

/// Normalize a histogram.
///
/// A histogram whose norm is zero is returned as all zeros.
///
/// # Arguments
///
/// * `hist` - The histogram counts.
/// * `norm` - The norm to use.
///
/// # Returns
///
/// The normalized histogram.
///
/// # Example
///
/// ```
/// use swirl_imgproc::histogram::{normalize_histogram, HistogramNorm};
///
/// let hist = normalize_histogram(&[3, 4], HistogramNorm::L2);
/// assert_eq!(hist, vec![0.6, 0.8]);
/// ```
pub fn normalize_histogram(hist: &[usize], norm: HistogramNorm) -> Vec<f64> {
    let values = hist.iter().map(|&h| h as f64);

    let scale = match norm {
        HistogramNorm::L1 => values.sum::<f64>(),
        HistogramNorm::L2 => values.map(|h| h * h).sum::<f64>().sqrt(),
        HistogramNorm::Inf => values.fold(0.0, f64::max),
    };

    if scale <= 0.0 {
        return vec![0.0; hist.len()];
    }

    hist.iter().map(|&h| h as f64 / scale).collect()
}

/// Method used to compare two histograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistogramComparison {
    /// Pearson correlation, in `[-1, 1]`, higher is more similar.
    #[default]
    Correlation,
    /// Chi-square distance, lower is more similar.
    ChiSquare,
    /// Sum of the bin-wise minimum, higher is more similar.
    Intersection,
    /// Bhattacharyya distance, in `[0, 1]`, lower is more similar.
    Bhattacharyya,
}

/// Compare two histograms.
///
/// The correlation of a constant histogram is undefined: `1.0` is returned
/// when both histograms are constant and `0.0` when only one of them is.
///
/// # Arguments
///
/// * `hist1` - The first histogram.
/// * `hist2` - The second histogram.
/// * `method` - The comparison method.
///
/// # Errors
///
/// Returns an error if the histograms have different lengths or are empty.
///
/// # Example
///
/// ```
/// use swirl_imgproc::histogram::{compare_histograms, HistogramComparison};
///
/// let a = [0.1, 0.5, 0.2, 0.9];
/// let score = compare_histograms(&a, &a, HistogramComparison::Correlation).unwrap();
/// assert!((score - 1.0).abs() < 1e-12);
/// ```
pub fn compare_histograms(
    hist1: &[f64],
    hist2: &[f64],
    method: HistogramComparison,
) -> Result<f64, ImageError> {
    if hist1.len() != hist2.len() {
        return Err(ImageError::HistogramSizeMismatch(hist1.len(), hist2.len()));
    }

    if hist1.is_empty() {
        return Err(ImageError::InvalidHistogramBins(0));
    }

    let pairs = hist1.iter().zip(hist2.iter());

    let result = match method {
        HistogramComparison::Correlation => {
            let scale = 1.0 / hist1.len() as f64;
            let (mut s1, mut s2, mut s11, mut s12, mut s22) = (0.0, 0.0, 0.0, 0.0, 0.0);
            for (&a, &b) in pairs {
                s1 += a;
                s2 += b;
                s11 += a * a;
                s12 += a * b;
                s22 += b * b;
            }
            let num = s12 - s1 * s2 * scale;
            let var1 = s11 - s1 * s1 * scale;
            let var2 = s22 - s2 * s2 * scale;
            match (var1.abs() > f64::EPSILON, var2.abs() > f64::EPSILON) {
                (true, true) => (num / (var1 * var2).sqrt()).clamp(-1.0, 1.0),
                (false, false) => 1.0,
                _ => 0.0,
            }
        }
        HistogramComparison::ChiSquare => pairs
            .filter(|(a, _)| a.abs() > f64::EPSILON)
            .map(|(a, b)| (a - b) * (a - b) / a)
            .sum(),
        HistogramComparison::Intersection => pairs.map(|(a, b)| a.min(*b)).sum(),
        HistogramComparison::Bhattacharyya => {
            let (mut s1, mut s2, mut acc) = (0.0, 0.0, 0.0);
            for (&a, &b) in pairs {
                s1 += a;
                s2 += b;
                acc += (a * b).sqrt();
            }
            let s = s1 * s2;
            let s = if s.abs() > f32::EPSILON as f64 {
                1.0 / s.sqrt()
            } else {
                1.0
            };
            (1.0 - acc * s).max(0.0).sqrt()
        }
    };

    Ok(result)
}
