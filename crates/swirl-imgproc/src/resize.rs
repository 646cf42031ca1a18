use crate::interpolation::{grid::meshgrid_from_fn, remap, InterpolationMode};
use swirl_image::{Image, ImageError};

/// Resize an image to a new size.
///
/// The function resizes an image to the size of `dst` using the specified
/// interpolation mode. The corners of both images are aligned.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use swirl_image::{Image, ImageSize};
/// use swirl_imgproc::resize::resize_native;
/// use swirl_imgproc::interpolation::InterpolationMode;
///
/// let image = Image::<_, 3>::new(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     vec![0f32; 4 * 5 * 3],
/// )
/// .unwrap();
///
/// let new_size = ImageSize {
///     width: 2,
///     height: 3,
/// };
///
/// let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0.0).unwrap();
///
/// resize_native(
///     &image,
///     &mut image_resized,
///     InterpolationMode::Nearest,
/// )
/// .unwrap();
///
/// assert_eq!(image_resized.num_channels(), 3);
/// assert_eq!(image_resized.size().width, 2);
/// assert_eq!(image_resized.size().height, 3);
/// ```
pub fn resize_native<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.size().is_empty() {
        return Err(ImageError::EmptyImage(src.cols(), src.rows()));
    }

    if dst.size().is_empty() {
        return Err(ImageError::EmptyImage(dst.cols(), dst.rows()));
    }

    let step = |src_len: usize, dst_len: usize| {
        if dst_len > 1 {
            (src_len - 1) as f32 / (dst_len - 1) as f32
        } else {
            0.0
        }
    };
    let (step_x, step_y) = (step(src.cols(), dst.cols()), step(src.rows(), dst.rows()));

    // create a grid of x and y coordinates for the output image
    // and interpolate the values from the input image.
    let (map_x, map_y) = meshgrid_from_fn(dst.cols(), dst.rows(), |x, y| {
        Ok((x as f32 * step_x, y as f32 * step_y))
    })?;

    remap(src, dst, &map_x, &map_y, interpolation)
}

/// Resize an image sampling at pixel centers.
///
/// Output pixel `i` reads the source at `(i + 0.5) * src_len / dst_len - 0.5`,
/// clamped to the image, as OpenCV's `resize` does.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container.
/// * `interpolation` - The interpolation mode to use.
///
/// # Example
///
/// ```
/// use swirl_image::Image;
/// use swirl_imgproc::interpolation::InterpolationMode;
/// use swirl_imgproc::resize::resize_pixel_centers;
///
/// let image = Image::<f32, 1>::new([4, 1].into(), vec![0.0, 10.0, 20.0, 30.0]).unwrap();
/// let mut half = Image::<f32, 1>::from_size_val([2, 1].into(), 0.0).unwrap();
///
/// resize_pixel_centers(&image, &mut half, InterpolationMode::Bilinear).unwrap();
/// assert_eq!(half.as_slice(), &[5.0, 25.0]);
/// ```
pub fn resize_pixel_centers<const C: usize>(
    src: &Image<f32, C>,
    dst: &mut Image<f32, C>,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    if src.size().is_empty() {
        return Err(ImageError::EmptyImage(src.cols(), src.rows()));
    }

    if dst.size().is_empty() {
        return Err(ImageError::EmptyImage(dst.cols(), dst.rows()));
    }

    let scale_x = src.cols() as f32 / dst.cols() as f32;
    let scale_y = src.rows() as f32 / dst.rows() as f32;
    let (max_x, max_y) = ((src.cols() - 1) as f32, (src.rows() - 1) as f32);

    let (map_x, map_y) = meshgrid_from_fn(dst.cols(), dst.rows(), |x, y| {
        let u = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, max_x);
        let v = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, max_y);
        Ok((u, v))
    })?;

    remap(src, dst, &map_x, &map_y, interpolation)
}

#[cfg(test)]
mod tests {
    use swirl_image::{Image, ImageError, ImageSize};

    use crate::interpolation::InterpolationMode;

    #[test]
    fn resize_smoke_ch3() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0f32; 4 * 5 * 3],
        )?;

        let new_size = ImageSize {
            width: 2,
            height: 3,
        };

        let mut image_resized = Image::<_, 3>::from_size_val(new_size, 0.0)?;

        super::resize_native(&image, &mut image_resized, InterpolationMode::Bilinear)?;

        assert_eq!(image_resized.num_channels(), 3);
        assert_eq!(image_resized.size(), new_size);

        Ok(())
    }

    #[test]
    fn resize_upscale_keeps_corners() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0f32, 10.0, 20.0, 30.0],
        )?;

        let mut image_resized = Image::<_, 1>::from_size_val([3, 3].into(), 0.0)?;
        super::resize_native(&image, &mut image_resized, InterpolationMode::Bilinear)?;

        assert_eq!(
            image_resized.as_slice(),
            &[0.0, 5.0, 10.0, 10.0, 15.0, 20.0, 20.0, 25.0, 30.0]
        );

        Ok(())
    }

    #[test]
    fn resize_pixel_centers_upscale() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new([2, 1].into(), vec![0f32, 100.0])?;
        let mut image_resized = Image::<_, 1>::from_size_val([4, 1].into(), 0.0)?;
        super::resize_pixel_centers(&image, &mut image_resized, InterpolationMode::Bilinear)?;

        // border samples are clamped to the outer pixels
        assert_eq!(image_resized.as_slice(), &[0.0, 25.0, 75.0, 100.0]);

        Ok(())
    }

    #[test]
    fn resize_pixel_centers_downscale() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new([4, 2].into(), vec![0f32, 10.0, 20.0, 30.0, 0.0, 10.0, 20.0, 30.0])?;
        let mut image_resized = Image::<_, 1>::from_size_val([2, 1].into(), 0.0)?;
        super::resize_pixel_centers(&image, &mut image_resized, InterpolationMode::Bilinear)?;
        assert_eq!(image_resized.as_slice(), &[5.0, 25.0]);

        let mut empty = Image::<_, 1>::from_size_val([0, 1].into(), 0.0)?;
        assert_eq!(
            super::resize_pixel_centers(&image, &mut empty, InterpolationMode::Bilinear),
            Err(ImageError::EmptyImage(0, 1))
        );

        Ok(())
    }

    #[test]
    fn resize_to_single_pixel() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new([2, 1].into(), vec![4f32, 8.0])?;
        let mut image_resized = Image::<_, 1>::from_size_val([1, 1].into(), 0.0)?;
        super::resize_native(&image, &mut image_resized, InterpolationMode::Nearest)?;
        assert_eq!(image_resized.as_slice(), &[4.0]);
        Ok(())
    }
}
