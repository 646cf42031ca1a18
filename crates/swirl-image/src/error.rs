/// An error type for the image module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageError {
    /// Error when the image has zero width or height.
    #[error("Image must not be empty, got {0}x{1}")]
    EmptyImage(usize, usize),

    /// Error when channel and shape are not valid.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidChannelShape(usize, usize),

    /// Error when two images (or an image and a map) do not have matching sizes.
    #[error("Invalid image size ({0}x{1}) does not match the expected size ({2}x{3})")]
    InvalidImageSize(usize, usize, usize, usize),

    /// Error when the pixel data cannot be cast.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when the channel index is out of bounds.
    #[error("Channel index {0} is out of bounds for {1} channels")]
    ChannelIndexOutOfBounds(usize, usize),

    /// Error when the pixel index is out of bounds.
    #[error("Pixel index ({0}, {1}) is out of bounds ({2}x{3})")]
    PixelIndexOutOfBounds(usize, usize, usize, usize),

    /// Error when a crop window does not fit inside the source image.
    #[error("Crop window at ({0}, {1}) of size {2}x{3} exceeds the image bounds")]
    InvalidCropWindow(usize, usize, usize, usize),

    /// Error when the number of histogram bins is invalid.
    #[error("Invalid number of histogram bins: {0}")]
    InvalidHistogramBins(usize),

    /// Error when two histograms have different lengths.
    #[error("Histogram lengths do not match ({0} vs {1})")]
    HistogramSizeMismatch(usize, usize),

    /// Error when the swirl radius is zero, negative or not finite.
    #[error("Swirl radius must be a finite value > 0, got {0}")]
    InvalidSwirlRadius(f32),

    /// Error when a swirl parameter is not a finite number.
    #[error("Swirl parameter `{0}` must be finite, got {1}")]
    InvalidSwirlParameter(&'static str, f32),
}
