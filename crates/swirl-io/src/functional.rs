use std::{fs::File, io::BufReader, path::Path};

use swirl_image::{Image, ImageSize};

use crate::{
    error::IoError,
    jpeg::write_image_jpeg_rgb8,
    png::write_image_png_rgb8,
};

/// Reads an RGB image from the given file path.
///
/// The format is guessed from the file content and any format supported by
/// the `image` crate is accepted. Grayscale, alpha and 16-bit images are
/// converted to 8-bit RGB.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An RGB image with three channels (rgb8).
pub fn read_image_any_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let file_path = file_path.as_ref();

    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let reader = BufReader::new(File::open(file_path)?);
    let img = image::ImageReader::new(reader)
        .with_guessed_format()?
        .decode()?;

    log::debug!(
        "decoded {} as {:?} ({}x{})",
        file_path.display(),
        img.color(),
        img.width(),
        img.height()
    );

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    Ok(Image::new(size, img.into_rgb8().into_raw())?)
}

/// Writes an RGB image to the given file path.
///
/// The encoder is chosen from the file extension: `jpg`/`jpeg` and `png` use
/// the dedicated encoders, other extensions known to the `image` crate (for
/// example `bmp` or `tiff`) are encoded through it.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image to write.
/// * `quality` - The JPEG quality in `[0, 100]`, ignored by other formats.
///
/// # Errors
///
/// Returns [`IoError::InvalidFileExtension`] if the extension is missing or
/// not recognised.
pub fn write_image_any_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    let Some(ext) = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
    else {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    };

    match ext.as_str() {
        "jpg" | "jpeg" => write_image_jpeg_rgb8(file_path, image, quality),
        "png" => write_image_png_rgb8(file_path, image),
        _ => {
            let format = image::ImageFormat::from_extension(&ext)
                .ok_or_else(|| IoError::InvalidFileExtension(file_path.to_path_buf()))?;

            let size = image.size();
            let buffer = image::RgbImage::from_raw(
                size.width as u32,
                size.height as u32,
                image.as_slice().to_vec(),
            )
            .ok_or_else(|| {
                IoError::UnsupportedImageFormat(format!("buffer does not match {size}"))
            })?;

            buffer.save_with_format(file_path, format)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> Result<Image<u8, 3>, IoError> {
        let mut data = Vec::with_capacity(16 * 8 * 3);
        for y in 0..8 {
            for x in 0..16 {
                let v = if (x / 4 + y / 4) % 2 == 0 { 230 } else { 25 };
                data.extend([v, v / 2, 255 - v]);
            }
        }
        Ok(Image::new([16, 8].into(), data)?)
    }

    #[test]
    fn write_read_any_lossless() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let image = checkerboard()?;

        for name in ["board.png", "board.PNG", "board.bmp"] {
            let file_path = tmp_dir.path().join(name);
            write_image_any_rgb8(&file_path, &image, 95)?;

            let image_back = read_image_any_rgb8(&file_path)?;
            assert_eq!(image_back.size(), image.size(), "{name}");
            assert_eq!(image_back.as_slice(), image.as_slice(), "{name}");
        }

        Ok(())
    }

    #[test]
    fn write_read_any_jpeg() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("board.jpeg");

        let image = checkerboard()?;
        write_image_any_rgb8(&file_path, &image, 95)?;

        let image_back = read_image_any_rgb8(&file_path)?;
        assert_eq!(image_back.size(), image.size());

        Ok(())
    }

    #[test]
    fn read_any_gray_png_is_rgb() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");

        image::GrayImage::from_raw(2, 2, vec![0, 50, 100, 150])
            .ok_or_else(|| IoError::UnsupportedImageFormat("gray".to_string()))?
            .save(&file_path)?;

        let image = read_image_any_rgb8(&file_path)?;
        assert_eq!(image.num_channels(), 3);
        assert_eq!(image.get_pixel(1, 1, 0)?, 150);
        assert_eq!(image.get_pixel(1, 1, 2)?, 150);

        Ok(())
    }

    #[test]
    fn write_any_invalid_extension() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let image = checkerboard()?;

        for name in ["board", "board.xyz"] {
            let file_path = tmp_dir.path().join(name);
            assert!(matches!(
                write_image_any_rgb8(&file_path, &image, 95),
                Err(IoError::InvalidFileExtension(_))
            ));
        }

        Ok(())
    }

    #[test]
    fn read_any_missing_file() {
        assert!(matches!(
            read_image_any_rgb8("does/not/exist.png"),
            Err(IoError::FileDoesNotExist(_))
        ));
    }
}
