use std::path::Path;

use rayon::prelude::*;
use swirl_image::{Image, ImageSize};
use swirl_imgproc::{
    color::gray_from_rgb_u8, interpolation::InterpolationMode, resize::resize_native,
};

use crate::{
    cascade::{Classification, HaarCascade},
    errors::FaceError,
    group::group_rectangles,
    integral::IntegralImage,
    FaceLocator, FaceRect,
};

/// Configuration of the multi-scale cascade detector.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeDetectorConfig {
    /// Ratio between two consecutive pyramid levels, greater than one.
    pub scale_factor: f64,
    /// A face needs more than this many raw detections to be reported.
    pub min_neighbors: usize,
    /// Relative tolerance used to merge raw detections.
    pub group_eps: f64,
    /// Smallest face size searched for, the cascade window when `None`.
    pub min_size: Option<ImageSize>,
    /// Largest face size searched for, the image size when `None`.
    pub max_size: Option<ImageSize>,
    /// Windows with a lower intensity standard deviation are skipped.
    pub min_window_stddev: f64,
}

impl Default for CascadeDetectorConfig {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 4,
            group_eps: 0.2,
            min_size: None,
            max_size: None,
            min_window_stddev: 1.0,
        }
    }
}

/// Face locator running a Haar cascade over an image pyramid.
#[derive(Debug, Clone)]
pub struct CascadeDetector {
    cascade: HaarCascade,
    config: CascadeDetectorConfig,
}

impl CascadeDetector {
    /// Create a detector from a loaded cascade.
    ///
    /// # Errors
    ///
    /// Returns an error if the scale factor is not finite or not greater than one.
    pub fn new(cascade: HaarCascade, config: CascadeDetectorConfig) -> Result<Self, FaceError> {
        if !config.scale_factor.is_finite() || config.scale_factor <= 1.0 {
            return Err(FaceError::InvalidScaleFactor(config.scale_factor));
        }

        Ok(Self { cascade, config })
    }

    /// Create a detector from an OpenCV cascade XML file.
    pub fn from_file(
        path: impl AsRef<Path>,
        config: CascadeDetectorConfig,
    ) -> Result<Self, FaceError> {
        Self::new(HaarCascade::from_file(path)?, config)
    }

    /// The cascade used by the detector.
    pub fn cascade(&self) -> &HaarCascade {
        &self.cascade
    }

    /// The detector configuration.
    pub fn config(&self) -> &CascadeDetectorConfig {
        &self.config
    }

    /// Detect faces in a grayscale image.
    ///
    /// Faces are returned largest first.
    pub fn detect(&self, gray: &Image<u8, 1>) -> Result<Vec<FaceRect>, FaceError> {
        let window = self.cascade.window_size();
        let scales = pyramid_scales(gray.size(), window, &self.config);

        log::debug!(
            "scanning {} with a {} window over {} scales",
            gray.size(),
            window,
            scales.len()
        );

        let mut candidates = Vec::new();
        for factor in scales {
            let scaled_size = ImageSize {
                width: (gray.width() as f64 / factor).round() as usize,
                height: (gray.height() as f64 / factor).round() as usize,
            };
            let scaled = if scaled_size == gray.size() {
                gray.clone()
            } else {
                downscale(gray, scaled_size)?
            };

            candidates.extend(self.scan_level(&scaled, factor));
        }

        let mut faces: Vec<FaceRect> = group_rectangles(
            &candidates,
            self.config.min_neighbors,
            self.config.group_eps,
        )
        .iter()
        .filter_map(|r| r.clip(gray.size()))
        .collect();

        faces.sort_by_key(|r| std::cmp::Reverse(r.area()));

        log::debug!(
            "{} raw detections grouped into {} faces",
            candidates.len(),
            faces.len()
        );

        Ok(faces)
    }

    fn scan_level(&self, scaled: &Image<u8, 1>, factor: f64) -> Vec<FaceRect> {
        let window = self.cascade.window_size();
        let ii = IntegralImage::new(scaled, self.cascade.has_tilted_features());

        let step = if factor > 2.0 { 1 } else { 2 };
        let max_x = scaled.width() - window.width;
        let max_y = scaled.height() - window.height;
        let width = (window.width as f64 * factor).round() as usize;
        let height = (window.height as f64 * factor).round() as usize;

        (0..max_y + 1)
            .into_par_iter()
            .step_by(step)
            .flat_map_iter(|y| {
                let mut row = Vec::new();
                let mut x = 0;
                while x <= max_x {
                    let (norm, stddev) = self.cascade.window_statistics(&ii, x, y);
                    if stddev >= self.config.min_window_stddev {
                        match self.cascade.classify(&ii, x, y, norm) {
                            Classification::Object => row.push(FaceRect {
                                x: (x as f64 * factor).round() as usize,
                                y: (y as f64 * factor).round() as usize,
                                width,
                                height,
                                neighbors: 1,
                            }),
                            // hopeless window, skip its neighbour too
                            Classification::Rejected { stage: 0 } => x += step,
                            Classification::Rejected { .. } => {}
                        }
                    }
                    x += step;
                }
                row
            })
            .collect()
    }
}

impl FaceLocator for CascadeDetector {
    fn locate(&self, image: &Image<u8, 3>) -> Result<Vec<FaceRect>, FaceError> {
        let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0)?;
        gray_from_rgb_u8(image, &mut gray)?;
        self.detect(&gray)
    }
}

/// Scale factors of the pyramid levels to scan.
///
/// Levels stop once the downscaled image no longer exceeds the window or the
/// scaled window exceeds `max_size`. Levels whose window is below `min_size`
/// are skipped.
fn pyramid_scales(image: ImageSize, window: ImageSize, config: &CascadeDetectorConfig) -> Vec<f64> {
    let max_size = config.max_size.unwrap_or(image);
    let min_size = config.min_size.unwrap_or(window);

    let mut scales = Vec::new();
    let mut factor = 1.0f64;
    loop {
        let win_w = (window.width as f64 * factor).round() as usize;
        let win_h = (window.height as f64 * factor).round() as usize;
        let scaled_w = (image.width as f64 / factor).round() as usize;
        let scaled_h = (image.height as f64 / factor).round() as usize;

        if scaled_w <= window.width || scaled_h <= window.height {
            break;
        }
        if win_w > max_size.width || win_h > max_size.height {
            break;
        }
        if win_w >= min_size.width && win_h >= min_size.height {
            scales.push(factor);
        }

        factor *= config.scale_factor;
    }

    scales
}

fn downscale(gray: &Image<u8, 1>, size: ImageSize) -> Result<Image<u8, 1>, FaceError> {
    let src = gray.cast::<f32>()?;
    let mut dst = Image::<f32, 1>::from_size_val(size, 0.0)?;
    resize_native(&src, &mut dst, InterpolationMode::Bilinear)?;
    Ok(dst.map_from_f32()?)
}
