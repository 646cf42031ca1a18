use std::{fs, path::Path};

use jpeg_encoder::{ColorType, Encoder};
use swirl_image::{Image, ImageSize};
use zune_jpeg::zune_core::{colorspace::ColorSpace, options::DecoderOptions};

use crate::error::IoError;

/// Writes the given JPEG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG image.
/// - `image` - The image to encode.
/// - `quality` - The quality of the JPEG encoding, range from 0 (lowest) to 100 (highest).
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    let size = image.size();
    let (width, height) = match (u16::try_from(size.width), u16::try_from(size.height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => return Err(IoError::JpegImageTooLarge(size.width, size.height)),
    };

    let encoder = Encoder::new_file(file_path, quality.min(100))?;
    encoder.encode(image.as_slice(), width, height, ColorType::Rgb)?;

    Ok(())
}

/// Read a JPEG image with three channels _(rgb8)_.
///
/// Grayscale and CMYK files are converted to RGB by the decoder.
///
/// # Arguments
///
/// - `file_path` - The path to the JPEG file.
///
/// # Returns
///
/// A RGB image with three channels _(rgb8)_.
pub fn read_image_jpeg_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    if file_path.extension().map_or(true, |ext| {
        !ext.eq_ignore_ascii_case("jpg") && !ext.eq_ignore_ascii_case("jpeg")
    }) {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let jpeg_data = fs::read(file_path)?;
    decode_image_jpeg_rgb8(&jpeg_data)
}

/// Decodes a JPEG image with three channels _(rgb8)_ from raw bytes.
///
/// # Arguments
///
/// - `src` - Raw bytes of the jpeg file.
pub fn decode_image_jpeg_rgb8(src: &[u8]) -> Result<Image<u8, 3>, IoError> {
    let options = DecoderOptions::default().jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = zune_jpeg::JpegDecoder::new_with_options(src, options);
    decoder.decode_headers()?;

    let image_info = decoder.info().ok_or_else(|| {
        IoError::JpegDecodingError(zune_jpeg::errors::DecodeErrors::Format(String::from(
            "Failed to find image info from its metadata",
        )))
    })?;

    let image_size = ImageSize {
        width: image_info.width as usize,
        height: image_info.height as usize,
    };

    let img_data = decoder.decode()?;
    if img_data.len() != image_size.width * image_size.height * 3 {
        return Err(IoError::UnsupportedImageFormat(format!(
            "expected 3 channels, decoded {} bytes for {image_size}",
            img_data.len()
        )));
    }

    Ok(Image::new(image_size, img_data)?)
}
