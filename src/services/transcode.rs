use std::io::Cursor;

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, ImageResult};

use crate::config::ImageConfig;

/// Extension of every stored blob.
pub const OUTPUT_EXTENSION: &str = "jpg";

/// A photo re-encoded into the stored format.
#[derive(Debug, Clone)]
pub struct TranscodedImage {
    pub data: Bytes,
    /// Dimensions read back from `data`; `None` when they could not be read.
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Decode any supported image, shrink it into the configured bounding box
/// and re-encode it as JPEG. CPU bound; call from the blocking pool.
pub fn transcode(input: &[u8], settings: &ImageConfig) -> ImageResult<TranscodedImage> {
    let img = ImageReader::new(Cursor::new(input))
        .with_guessed_format()?
        .decode()?;

    let img = fit_within(img, settings.max_width, settings.max_height);

    // JPEG has no alpha channel.
    let rgb = img.to_rgb8();
    let mut encoded = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut encoded, settings.quality);
        encoder.encode_image(&rgb)?;
    }

    let (width, height) = match read_dimensions(&encoded) {
        Some((w, h)) => (Some(w), Some(h)),
        None => (None, None),
    };

    Ok(TranscodedImage {
        data: Bytes::from(encoded),
        width,
        height,
    })
}

/// Shrink to fit the box, keeping the aspect ratio. Never enlarges.
fn fit_within(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
    if img.width() <= max_width && img.height() <= max_height {
        return img;
    }
    img.resize(max_width, max_height, FilterType::Lanczos3)
}

fn read_dimensions(encoded: &[u8]) -> Option<(u32, u32)> {
    ImageReader::with_format(Cursor::new(encoded), ImageFormat::Jpeg)
        .into_dimensions()
        .ok()
}
