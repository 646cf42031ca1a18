use swirl_image::{Image, ImageError, ImageSize};

use crate::interpolation::{grid::meshgrid_from_fn, remap, InterpolationMode};

/// Parameters of the swirl distortion.
///
/// The angular offset applied to a pixel at distance `r` from the center is
///
/// `strength * ((radius - r * decay_scale) / radius)^2`
///
/// for `r <= radius`, and zero beyond the radius.
///
/// # Fields
///
/// * `strength` - Rotation intensity in radians at the center; the sign picks the direction.
/// * `radius` - Effective radius of the effect in pixels, must be `> 0`.
/// * `center` - Center `(x, y)` of the effect. `None` uses the image center.
/// * `decay_scale` - Multiplier applied to the radial distance before computing the decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwirlParams {
    /// Rotation intensity in radians at the center.
    pub strength: f32,
    /// Effective radius of the effect in pixels.
    pub radius: f32,
    /// Center of the effect, `None` for the image center.
    pub center: Option<(f32, f32)>,
    /// Scaling factor of the radial distance in the decay function.
    pub decay_scale: f32,
}

impl Default for SwirlParams {
    fn default() -> Self {
        Self {
            strength: 1.0,
            radius: 100.0,
            center: None,
            decay_scale: 0.9,
        }
    }
}

impl SwirlParams {
    /// Create swirl parameters with the given strength and radius.
    pub fn new(strength: f32, radius: f32) -> Self {
        Self {
            strength,
            radius,
            ..Default::default()
        }
    }

    /// Set an explicit center for the effect.
    pub fn with_center(mut self, cx: f32, cy: f32) -> Self {
        self.center = Some((cx, cy));
        self
    }

    /// Set the decay scale.
    pub fn with_decay_scale(mut self, decay_scale: f32) -> Self {
        self.decay_scale = decay_scale;
        self
    }

    /// Check that the parameters can produce a well defined coordinate field.
    ///
    /// # Errors
    ///
    /// * [`ImageError::InvalidSwirlRadius`] if the radius is not finite or `<= 0`.
    /// * [`ImageError::InvalidSwirlParameter`] if any other value is not finite.
    pub fn validate(&self) -> Result<(), ImageError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ImageError::InvalidSwirlRadius(self.radius));
        }

        let mut values = vec![("strength", self.strength), ("decay_scale", self.decay_scale)];
        if let Some((cx, cy)) = self.center {
            values.extend([("center.x", cx), ("center.y", cy)]);
        }

        match values.into_iter().find(|(_, v)| !v.is_finite()) {
            Some((name, v)) => Err(ImageError::InvalidSwirlParameter(name, v)),
            None => Ok(()),
        }
    }

    /// Resolve the center of the effect for an image of the given size.
    ///
    /// Without an explicit center this is `(width / 2, height / 2)` using integer division.
    pub fn center_for(&self, size: ImageSize) -> (f32, f32) {
        self.center
            .unwrap_or(((size.width / 2) as f32, (size.height / 2) as f32))
    }
}

/// Compute the source coordinate sampled by the output pixel `(x, y)`.
///
/// The result is not clamped to the image bounds.
///
/// # Arguments
///
/// * `x` - The x coordinate of the output pixel.
/// * `y` - The y coordinate of the output pixel.
/// * `center` - The resolved center of the effect.
/// * `params` - The swirl parameters.
///
/// # Returns
///
/// The `(x, y)` source coordinate.
///
/// # Example
///
/// ```
/// use swirl_imgproc::warp::{swirl_point, SwirlParams};
///
/// let params = SwirlParams::new(2.0, 10.0);
///
/// // outside the radius the point maps onto itself
/// let (u, v) = swirl_point(30.0, 0.0, (0.0, 0.0), &params);
/// assert!((u - 30.0).abs() < 1e-9 && v.abs() < 1e-9);
/// ```
pub fn swirl_point(x: f64, y: f64, center: (f64, f64), params: &SwirlParams) -> (f64, f64) {
    let (cx, cy) = center;
    let (dx, dy) = (x - cx, y - cy);

    let r = dx.hypot(dy);
    let theta = dy.atan2(dx);

    let radius = params.radius as f64;
    let theta_new = if r > radius {
        theta
    } else {
        let decay = ((radius - r * params.decay_scale as f64) / radius).powi(2);
        theta + params.strength as f64 * decay
    };

    let (sin, cos) = theta_new.sin_cos();
    (r * cos + cx, r * sin + cy)
}

/// Generate the coordinate field of a swirl for an image of the given size.
///
/// Every entry is clamped to `[0, width - 1] x [0, height - 1]`, so sampling
/// the source with these maps never reads out of bounds.
///
/// # Arguments
///
/// * `params` - The swirl parameters.
/// * `size` - The size of the image.
///
/// # Returns
///
/// * `map_x` - The x source coordinate of every output pixel.
/// * `map_y` - The y source coordinate of every output pixel.
///
/// # Errors
///
/// Returns an error if the image is empty or the parameters are invalid.
pub fn generate_swirl_map(
    params: &SwirlParams,
    size: ImageSize,
) -> Result<(Image<f32, 1>, Image<f32, 1>), ImageError> {
    if size.is_empty() {
        return Err(ImageError::EmptyImage(size.width, size.height));
    }
    params.validate()?;

    let (cx, cy) = params.center_for(size);
    let (max_x, max_y) = ((size.width - 1) as f64, (size.height - 1) as f64);

    // the effect cannot reach the image when its disc lies entirely outside
    let (nx, ny) = ((cx as f64).clamp(0.0, max_x), (cy as f64).clamp(0.0, max_y));
    if (nx - cx as f64).hypot(ny - cy as f64) > params.radius as f64 {
        log::warn!(
            "swirl center ({cx}, {cy}) with radius {} does not touch the {size}",
            params.radius
        );
    }

    meshgrid_from_fn(size.width, size.height, |x, y| {
        let (u, v) = swirl_point(x as f64, y as f64, (cx as f64, cy as f64), params);
        Ok((u.clamp(0.0, max_x) as f32, v.clamp(0.0, max_y) as f32))
    })
}

/// Apply a swirl distortion to an image.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image, same shape as `src`.
/// * `params` - The swirl parameters.
/// * `interpolation` - The interpolation mode used to sample the source.
///
/// # Errors
///
/// Returns an error if the images differ in size, are empty, or the parameters are invalid.
///
/// # Example
///
/// ```
/// use swirl_image::{Image, ImageSize};
/// use swirl_imgproc::interpolation::InterpolationMode;
/// use swirl_imgproc::warp::{swirl, SwirlParams};
///
/// let src = Image::<f32, 3>::from_size_val(
///     ImageSize {
///         width: 8,
///         height: 6,
///     },
///     1.0,
/// )
/// .unwrap();
///
/// let mut dst = Image::<f32, 3>::from_size_val(src.size(), 0.0).unwrap();
///
/// swirl(&src, &mut dst, &SwirlParams::new(3.0, 4.0), InterpolationMode::Bicubic).unwrap();
///
/// assert_eq!(dst.size(), src.size());
/// ```
pub fn swirl<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    params: &SwirlParams,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }

    log::debug!("swirl {} with {params:?}", src.size());

    let (map_x, map_y) = generate_swirl_map(params, src.size())?;

    remap(src, dst, &map_x, &map_y, interpolation)
}

/// Apply a swirl distortion with bicubic sampling and return a new image.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `params` - The swirl parameters.
///
/// # Returns
///
/// The distorted image, with the same size as `src`.
pub fn twist<const C: usize>(
    src: &Image<f32, C>,
    params: &SwirlParams,
) -> Result<Image<f32, C>, ImageError> {
    let mut dst = Image::from_size_val(src.size(), 0.0)?;
    swirl(src, &mut dst, params, InterpolationMode::Bicubic)?;
    Ok(dst)
}
