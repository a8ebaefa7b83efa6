use crate::error::{EmotionError, Result};
use image::{ImageFormat, imageops::FilterType};
use kornia_image::{Image, ImageSize, allocator::CpuAllocator};
use std::{io::Cursor, path::Path};

/// RGB8 pixel array handed to facial-analysis capabilities.
pub type FaceImage = Image<u8, 3, CpuAllocator>;

/// Input size of the classic 48x48 facial-expression models.
pub const DEFAULT_TARGET_SIZE: (u32, u32) = (48, 48);

/// Reads a JPEG or PNG file, choosing the decoder from the extension.
pub fn read_image(path: impl AsRef<Path>) -> Result<FaceImage> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| EmotionError::UnsupportedFormat(path.display().to_string()))?;

    match extension.as_str() {
        "jpg" | "jpeg" => kornia_io::jpeg::read_image_jpeg_rgb8(path)
            .map_err(|e| EmotionError::ImageRead(e.to_string())),
        "png" => kornia_io::png::read_image_png_rgb8(path)
            .map_err(|e| EmotionError::ImageRead(e.to_string())),
        _ => Err(EmotionError::UnsupportedFormat(extension)),
    }
}

/// Decodes an uploaded file held in memory. The format is sniffed from the
/// content and the result is converted to RGB8.
pub fn decode_image(bytes: &[u8]) -> Result<FaceImage> {
    let rgb = image::load_from_memory(bytes)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    image_from_rgb8(width as usize, height as usize, rgb.into_raw())
}

/// Wraps a packed RGB8 buffer of `width * height * 3` bytes.
pub fn image_from_rgb8(width: usize, height: usize, data: Vec<u8>) -> Result<FaceImage> {
    Image::new(ImageSize { width, height }, data, CpuAllocator)
        .map_err(|e| EmotionError::InvalidImage(e.to_string()))
}

fn to_rgb_buffer(image: &FaceImage) -> Result<image::RgbImage> {
    image::RgbImage::from_raw(
        image.width() as u32,
        image.height() as u32,
        image.as_slice().to_vec(),
    )
    .ok_or_else(|| EmotionError::InvalidImage("pixel buffer does not match image size".into()))
}

/// Encodes the image as PNG, e.g. for shipping it to a remote service.
pub fn encode_png(image: &FaceImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    to_rgb_buffer(image)?.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Converts to grayscale, resizes to `target_size` and scales intensities to
/// `[0, 1]`. The returned buffer is row-major.
pub fn preprocess_image(image: &FaceImage, target_size: (u32, u32)) -> Result<Vec<f32>> {
    let (width, height) = target_size;
    if width == 0 || height == 0 {
        return Err(EmotionError::InvalidImage(format!(
            "target size must be non-zero, got {width}x{height}"
        )));
    }
    let gray = image::DynamicImage::ImageRgb8(to_rgb_buffer(image)?).to_luma8();
    let resized = image::imageops::resize(&gray, width, height, FilterType::Triangle);
    Ok(resized
        .into_raw()
        .into_iter()
        .map(|pixel| pixel as f32 / 255.0)
        .collect())
}
