use swirl_image::{Image, ImageSize};
use swirl_imgproc::{
    crop::crop_image, interpolation::InterpolationMode, resize::resize_pixel_centers,
};

use crate::errors::FaceError;

/// Default width of an extracted face region.
pub const DEFAULT_REGION_WIDTH: usize = 287;

/// Default height of an extracted face region.
pub const DEFAULT_REGION_HEIGHT: usize = 392;

/// Axis aligned bounding box of a located face, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRect {
    /// Left coordinate.
    pub x: usize,
    /// Top coordinate.
    pub y: usize,
    /// Width of the box.
    pub width: usize,
    /// Height of the box.
    pub height: usize,
    /// Number of raw detections merged into this box.
    pub neighbors: usize,
}

impl FaceRect {
    /// Area of the box in pixels.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Clip the box to an image of the given size.
    ///
    /// Returns `None` when nothing of the box is left.
    pub fn clip(&self, size: ImageSize) -> Option<FaceRect> {
        if self.x >= size.width || self.y >= size.height {
            return None;
        }

        let width = self.width.min(size.width - self.x);
        let height = self.height.min(size.height - self.y);
        if width == 0 || height == 0 {
            return None;
        }

        Some(FaceRect {
            width,
            height,
            ..*self
        })
    }
}

/// A face cropped out of an image and resized to a fixed size.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRegion {
    /// The rectangle the face was cut from, clipped to the source image.
    pub rect: FaceRect,
    /// The resized face pixels.
    pub image: Image<u8, 3>,
}

impl FaceRegion {
    /// Crop `rect` out of `image` and resize it bilinearly to `target`.
    ///
    /// The resize samples at pixel centers.
    ///
    /// # Errors
    ///
    /// Returns an error if `target` is empty or `rect` does not intersect the image.
    pub fn extract(
        image: &Image<u8, 3>,
        rect: &FaceRect,
        target: ImageSize,
    ) -> Result<Self, FaceError> {
        if target.is_empty() {
            return Err(FaceError::InvalidRegionSize(target.width, target.height));
        }

        let rect = rect.clip(image.size()).ok_or(FaceError::RectOutOfBounds(
            rect.x,
            rect.y,
            image.width(),
            image.height(),
        ))?;

        let mut crop = Image::<u8, 3>::from_size_val([rect.width, rect.height].into(), 0)?;
        crop_image(image, &mut crop, rect.x, rect.y)?;

        let crop = crop.cast::<f32>()?;
        let mut resized = Image::<f32, 3>::from_size_val(target, 0.0)?;
        resize_pixel_centers(&crop, &mut resized, InterpolationMode::Bilinear)?;

        Ok(Self {
            rect,
            image: resized.map_from_f32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_rect() {
        let size = ImageSize {
            width: 100,
            height: 80,
        };
        let rect = FaceRect {
            x: 90,
            y: 10,
            width: 20,
            height: 20,
            neighbors: 5,
        };

        let clipped = rect.clip(size).expect("partially inside");
        assert_eq!(clipped.width, 10);
        assert_eq!(clipped.height, 20);
        assert_eq!(clipped.neighbors, 5);
        assert_eq!(clipped.area(), 200);

        assert_eq!(FaceRect { x: 100, ..rect }.clip(size), None);
        assert_eq!(FaceRect { y: 80, ..rect }.clip(size), None);
        assert_eq!(FaceRect { width: 0, ..rect }.clip(size), None);
    }

    #[test]
    fn extract_region() -> Result<(), FaceError> {
        // left half red, right half blue
        let data = (0..8 * 6)
            .flat_map(|i| if i % 8 < 4 { [255, 0, 0] } else { [0, 0, 255] })
            .collect();
        let image = Image::<u8, 3>::new([8, 6].into(), data)?;

        let rect = FaceRect {
            x: 0,
            y: 1,
            width: 4,
            height: 4,
            neighbors: 1,
        };
        let region = FaceRegion::extract(&image, &rect, [10, 12].into())?;

        assert_eq!(region.rect, rect);
        assert_eq!(region.image.size(), [10, 12].into());
        assert!(region
            .image
            .as_slice()
            .chunks_exact(3)
            .all(|px| px == [255, 0, 0]));

        Ok(())
    }

    #[test]
    fn extract_region_samples_pixel_centers() -> Result<(), FaceError> {
        let image = Image::<u8, 3>::new([2, 1].into(), vec![0, 0, 0, 100, 100, 100])?;
        let rect = FaceRect {
            x: 0,
            y: 0,
            width: 2,
            height: 1,
            neighbors: 1,
        };

        let region = FaceRegion::extract(&image, &rect, [4, 1].into())?;
        let red: Vec<u8> = region.image.as_slice().iter().step_by(3).copied().collect();
        assert_eq!(red, vec![0, 25, 75, 100]);

        Ok(())
    }

    #[test]
    fn extract_region_errors() -> Result<(), FaceError> {
        let image = Image::<u8, 3>::from_size_val([8, 6].into(), 10)?;
        let rect = FaceRect {
            x: 2,
            y: 2,
            width: 4,
            height: 4,
            neighbors: 1,
        };

        assert!(matches!(
            FaceRegion::extract(&image, &rect, [0, 12].into()),
            Err(FaceError::InvalidRegionSize(0, 12))
        ));
        assert!(matches!(
            FaceRegion::extract(&image, &FaceRect { x: 8, ..rect }, [4, 4].into()),
            Err(FaceError::RectOutOfBounds(8, 2, 8, 6))
        ));

        // partially outside rectangles are clipped
        let region = FaceRegion::extract(&image, &FaceRect { x: 6, ..rect }, [4, 4].into())?;
        assert_eq!(region.rect.width, 2);

        Ok(())
    }
}
