//! Artwork post-processing
//!
//! Re-encodes a downloaded cover image in place: optional square resize,
//! then the target codec at a fixed quality preset. This step runs after a
//! transfer has already succeeded, so callers treat failures here as
//! warnings rather than download failures and leave the original file on
//! disk untouched.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::ArtworkError;
use crate::types::{ArtworkFormat, ArtworkSettings, CompressionLevel};

/// JPEG quality used for [`CompressionLevel::Low`]
const JPEG_QUALITY_LOW: u8 = 90;

/// JPEG quality used for [`CompressionLevel::High`]
const JPEG_QUALITY_HIGH: u8 = 70;

/// Re-encode the image at `path` according to `settings`
///
/// The resize step always produces a `resolution x resolution` square,
/// discarding the source aspect ratio. Cover art in the supported catalogs
/// is square, and non-square sources are deliberately forced square rather
/// than letterboxed.
///
/// Decoding expands palette-indexed sources to full color, so every encode
/// branch below starts from truecolor pixels.
pub fn process_artwork(path: &Path, settings: &ArtworkSettings) -> Result<(), ArtworkError> {
    let mut image = decode(path)?;

    if settings.resize {
        image = image.resize_exact(
            settings.resolution,
            settings.resolution,
            FilterType::CatmullRom,
        );
    }

    match settings.format {
        ArtworkFormat::Jpeg => encode_jpeg(&image, path, settings.compression),
        ArtworkFormat::Png => encode_png(&image, path),
        ArtworkFormat::Keep => encode_as_is(&image, path),
    }
}

fn encode_jpeg(
    image: &DynamicImage,
    path: &Path,
    compression: CompressionLevel,
) -> Result<(), ArtworkError> {
    let quality = match compression {
        CompressionLevel::Low => JPEG_QUALITY_LOW,
        CompressionLevel::High => JPEG_QUALITY_HIGH,
    };

    // JPEG carries no alpha channel; flatten before encoding
    let pixels = image.to_rgb8();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    pixels.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))?;
    writer.flush()?;
    Ok(())
}

fn encode_png(image: &DynamicImage, path: &Path) -> Result<(), ArtworkError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    // The low/high compression setting is not mapped onto PNG; it always
    // writes at the encoder's default level
    let encoder = PngEncoder::new_with_quality(
        &mut writer,
        CompressionType::Default,
        PngFilter::Adaptive,
    );
    image.write_with_encoder(encoder)?;
    writer.flush()?;
    Ok(())
}

/// Decode by content, not extension: downloaded covers routinely carry a
/// mismatched or meaningless extension
fn decode(path: &Path) -> Result<DynamicImage, ArtworkError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?.decode()?)
}

/// Re-encode with default settings in whatever format the file already has,
/// judging by its extension
fn encode_as_is(image: &DynamicImage, path: &Path) -> Result<(), ArtworkError> {
    let format = ImageFormat::from_path(path).map_err(|_| ArtworkError::UnknownFormat {
        path: path.to_path_buf(),
    })?;

    match format {
        ImageFormat::Jpeg => image.to_rgb8().save_with_format(path, format)?,
        _ => image.save_with_format(path, format)?,
    }
    Ok(())
}

/// Pixel width of the image at `path`, read from the header without a full
/// decode. Cover art is square in practice, so the width doubles as the
/// image's resolution.
pub fn image_resolution(path: &Path) -> Result<u32, ArtworkError> {
    let (width, _height) = image::image_dimensions(path)?;
    Ok(width)
}

/// Root-mean-square difference between two images
///
/// Both images are compared channel-wise in RGB, the per-pixel differences
/// are reduced to grayscale, and the RMS over all pixels is returned.
/// Identical images yield `0.0`; the value grows with visual distance.
/// Callers pick their own closeness threshold.
pub fn image_difference(first: &Path, second: &Path) -> Result<f64, ArtworkError> {
    let a = decode(first)?.to_rgb8();
    let b = decode(second)?.to_rgb8();

    if a.dimensions() != b.dimensions() {
        return Err(ArtworkError::DimensionMismatch {
            first: a.dimensions(),
            second: b.dimensions(),
        });
    }

    let (width, height) = a.dimensions();
    let mut diff = image::RgbImage::new(width, height);
    for (out, (pa, pb)) in diff.pixels_mut().zip(a.pixels().zip(b.pixels())) {
        for channel in 0..3 {
            out.0[channel] = pa.0[channel].abs_diff(pb.0[channel]);
        }
    }

    let gray = DynamicImage::ImageRgb8(diff).into_luma8();
    let pixel_count = f64::from(width) * f64::from(height);
    let sum_squares: f64 = gray.pixels().map(|p| f64::from(p.0[0]).powi(2)).sum();
    Ok((sum_squares / pixel_count).sqrt())
}
