//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, WebP, TIFF, BMP, GIF, ICO) | `image::ImageReader` with content sniffing |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode | format-specific encoder picked from the output extension |
//! | ICC profile | `ImageDecoder::icc_profile` → `ImageEncoder::set_icc_profile` (PNG, JPEG, WebP, TIFF) |
//!
//! Output is encoded into memory before anything touches the destination
//! path. A failed decode or encode therefore never truncates an existing
//! file, and a successful run always replaces the whole file.

use super::backend::{BackendError, ImageBackend};
use super::params::{Dimensions, ResizeParams};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tiff::TiffEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{
    ColorType, DynamicImage, ImageDecoder, ImageEncoder, ImageFormat, ImageReader, ImageResult,
};
use log::debug;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use std::sync::LazyLock;

/// Output extensions mapped to the encoder that handles them.
const OUTPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("webp", ImageFormat::WebP),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("bmp", ImageFormat::Bmp),
    ("gif", ImageFormat::Gif),
    ("ico", ImageFormat::Ico),
];

static SUPPORTED_OUTPUT_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    OUTPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.writing_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of output file extensions that have working encoders compiled in.
pub fn supported_output_extensions() -> &'static [&'static str] {
    &SUPPORTED_OUTPUT_EXTENSIONS
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the encoder for a destination path from its extension.
fn output_format(path: &Path) -> Result<ImageFormat, BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if ext.is_empty() {
        return Err(BackendError::UnsupportedFormat(format!(
            "{} has no file extension",
            path.display()
        )));
    }

    OUTPUT_CANDIDATES
        .iter()
        .find(|(candidate, fmt)| *candidate == ext && fmt.writing_enabled())
        .map(|(_, fmt)| *fmt)
        .ok_or(BackendError::UnsupportedFormat(ext))
}

/// Largest resampling buffer we are willing to allocate.
///
/// Resampling works on an f32 RGBA intermediate (16 bytes per pixel). The cap
/// matches `image::Limits::default().max_alloc`.
const MAX_RESAMPLE_BYTES: u64 = 512 * 1024 * 1024;

/// True if a `width × height` f32 RGBA buffer fits under [`MAX_RESAMPLE_BYTES`].
fn fits_resample_buffer(width: u32, height: u32) -> bool {
    (width as u64 * height as u64).saturating_mul(16) <= MAX_RESAMPLE_BYTES
}

/// Open a reader that trusts file content over the file extension.
fn open_reader(path: &Path) -> Result<ImageReader<BufReader<File>>, BackendError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

/// A decoded image plus the embedded color profile, if the source had one.
struct Decoded {
    image: DynamicImage,
    icc_profile: Option<Vec<u8>>,
}

/// Load and decode an image from disk, keeping its ICC profile.
fn load_image(path: &Path) -> Result<Decoded, BackendError> {
    let decode_err = |e: image::ImageError| BackendError::Decode {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let mut decoder = open_reader(path)?.into_decoder().map_err(decode_err)?;
    let icc_profile = decoder.icc_profile().unwrap_or_else(|e| {
        debug!("ignoring unreadable ICC profile in {}: {}", path.display(), e);
        None
    });
    let image = DynamicImage::from_decoder(decoder).map_err(decode_err)?;
    Ok(Decoded { image, icc_profile })
}

/// Write through `encoder`, attaching the ICC profile when the format takes one.
fn write_with_profile(
    img: &DynamicImage,
    mut encoder: impl ImageEncoder,
    icc_profile: Option<Vec<u8>>,
) -> ImageResult<()> {
    if let Some(profile) = icc_profile {
        if let Err(e) = encoder.set_icc_profile(profile) {
            debug!("dropping ICC profile: {}", e);
        }
    }
    img.write_with_encoder(encoder)
}

/// Encode into an in-memory buffer.
///
/// JPEG has no alpha channel and no 16-bit mode, so anything other than
/// L8/Rgb8 is flattened to Rgb8 first. Every other format gets the pixels
/// in their original color type. PNG, JPEG, WebP and TIFF carry the ICC
/// profile over; BMP, GIF and ICO have nowhere to put it.
fn encode_image(
    img: &DynamicImage,
    format: ImageFormat,
    icc_profile: Option<Vec<u8>>,
    path: &Path,
) -> Result<Vec<u8>, BackendError> {
    let flattened;
    let img = match (format, img.color()) {
        (ImageFormat::Jpeg, ColorType::L8 | ColorType::Rgb8) => img,
        (ImageFormat::Jpeg, _) => {
            flattened = DynamicImage::ImageRgb8(img.to_rgb8());
            &flattened
        }
        _ => img,
    };

    let mut buf = Cursor::new(Vec::new());
    let result = match format {
        ImageFormat::Png => write_with_profile(img, PngEncoder::new(&mut buf), icc_profile),
        ImageFormat::Jpeg => write_with_profile(img, JpegEncoder::new(&mut buf), icc_profile),
        ImageFormat::WebP => {
            write_with_profile(img, WebPEncoder::new_lossless(&mut buf), icc_profile)
        }
        ImageFormat::Tiff => write_with_profile(img, TiffEncoder::new(&mut buf), icc_profile),
        other => img.write_to(&mut buf, other),
    };
    result.map_err(|e| BackendError::Encode {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(buf.into_inner())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_reader(path)?
            .into_dimensions()
            .map_err(|e| BackendError::Decode {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let invalid = || BackendError::InvalidDimensions {
            width: params.width,
            height: params.height,
        };
        if params.width == 0 || params.height == 0 {
            return Err(invalid());
        }
        if !fits_resample_buffer(params.width, params.height) {
            return Err(invalid());
        }
        let format = output_format(&params.output)?;

        let Decoded { image: img, icc_profile } = load_image(&params.source)?;
        debug!(
            "decoded {} ({}x{}, {:?}, icc: {})",
            params.source.display(),
            img.width(),
            img.height(),
            img.color(),
            icc_profile.is_some()
        );

        // The vertical pass runs first and allocates source width × target height.
        if !fits_resample_buffer(img.width(), params.height) {
            return Err(invalid());
        }

        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        let bytes = encode_image(&resized, format, icc_profile, &params.output)?;
        std::fs::write(&params.output, &bytes)?;

        debug!(
            "wrote {} ({:?}, {} bytes)",
            params.output.display(),
            format,
            bytes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::path::PathBuf;

    /// Create a small valid PNG file with the given dimensions.
    fn create_test_png(path: &Path, width: u32, height: u32) {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    fn create_test_rgba_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 64, ((x + y) % 256) as u8])
        });
        img.save_with_format(path, ImageFormat::Png).unwrap();
    }

    fn params(source: PathBuf, output: PathBuf, width: u32, height: u32) -> ResizeParams {
        ResizeParams {
            source,
            output,
            width,
            height,
        }
    }

    #[test]
    fn supported_extensions_match_encodable_formats() {
        let exts = supported_output_extensions();
        for expected in &["png", "jpg", "jpeg", "webp", "ico"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn output_format_is_case_insensitive() {
        assert_eq!(
            output_format(Path::new("/out/ICON.PNG")).unwrap(),
            ImageFormat::Png
        );
        assert_eq!(
            output_format(Path::new("/out/shot.Jpeg")).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn output_format_rejects_unknown_and_missing_extension() {
        assert!(matches!(
            output_format(Path::new("/out/icon.xyz")),
            Err(BackendError::UnsupportedFormat(ext)) if ext == "xyz"
        ));
        assert!(matches!(
            output_format(Path::new("/out/icon")),
            Err(BackendError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn identify_synthetic_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.png");
        create_test_png(&path, 200, 150);

        let dims = RustBackend::new().identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_sniffs_content_over_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let png = tmp.path().join("real.png");
        create_test_png(&png, 40, 30);
        let misnamed = tmp.path().join("actually-png.jpg");
        std::fs::copy(&png, &misnamed).unwrap();

        let dims = RustBackend::new().identify(&misnamed).unwrap();
        assert_eq!((dims.width, dims.height), (40, 30));
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let result = RustBackend::new().identify(Path::new("/nonexistent/image.png"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn resize_square() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("icon.png");
        create_test_png(&source, 256, 256);
        let output = tmp.path().join("icon-64.png");

        RustBackend::new()
            .resize(&params(source, output.clone(), 64, 64))
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (64, 64));
    }

    #[test]
    fn resize_stretches_to_exact_rectangle() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("shot.png");
        create_test_png(&source, 234, 108);
        let output = tmp.path().join("shot-portrait.png");

        RustBackend::new()
            .resize(&params(source, output.clone(), 108, 192))
            .unwrap();

        // Aspect ratio is not preserved: landscape in, portrait out.
        assert_eq!(image::image_dimensions(&output).unwrap(), (108, 192));
    }

    #[test]
    fn resize_preserves_alpha_for_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("icon.png");
        create_test_rgba_png(&source, 100, 100);
        let output = tmp.path().join("icon-32.png");

        RustBackend::new()
            .resize(&params(source, output.clone(), 32, 32))
            .unwrap();

        let out = image::open(&output).unwrap();
        assert_eq!(out.color(), ColorType::Rgba8);
    }

    #[test]
    fn resize_rgba_to_jpeg_flattens_alpha() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("icon.png");
        create_test_rgba_png(&source, 100, 80);
        let output = tmp.path().join("icon.jpg");

        RustBackend::new()
            .resize(&params(source, output.clone(), 50, 40))
            .unwrap();

        let out = image::open(&output).unwrap();
        assert_eq!((out.width(), out.height()), (50, 40));
        assert_eq!(out.color(), ColorType::Rgb8);
    }

    #[test]
    fn resize_to_webp() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("shot.png");
        create_test_png(&source, 120, 90);
        let output = tmp.path().join("shot.webp");

        RustBackend::new()
            .resize(&params(source, output.clone(), 60, 45))
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (60, 45));
    }

    #[test]
    fn resize_zero_dimension_errors_without_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("icon.png");
        create_test_png(&source, 50, 50);
        let output = tmp.path().join("out.png");

        let result = RustBackend::new().resize(&params(source, output.clone(), 0, 50));
        assert!(matches!(
            result,
            Err(BackendError::InvalidDimensions {
                width: 0,
                height: 50
            })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn resize_huge_target_errors_without_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("tiny.png");
        create_test_png(&source, 2, 2);
        let output = tmp.path().join("out.png");

        let result =
            RustBackend::new().resize(&params(source, output.clone(), 1_000_000, 1_000_000));
        assert!(matches!(
            result,
            Err(BackendError::InvalidDimensions {
                width: 1_000_000,
                height: 1_000_000
            })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn resize_huge_intermediate_errors_without_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        // Target alone is tiny; source width × target height is not.
        let source = tmp.path().join("strip.png");
        create_test_png(&source, 100_000, 1);
        let output = tmp.path().join("out.png");

        let result = RustBackend::new().resize(&params(source, output.clone(), 1, 400));
        assert!(matches!(result, Err(BackendError::InvalidDimensions { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn resample_buffer_cap_boundaries() {
        assert!(fits_resample_buffer(1080, 1920));
        assert!(fits_resample_buffer(8192, 4096));
        assert!(!fits_resample_buffer(8192, 4097));
        assert!(!fits_resample_buffer(u32::MAX, u32::MAX));
    }

    fn create_png_with_icc(path: &Path, width: u32, height: u32, profile: &[u8]) {
        let img = RgbImage::from_fn(width, height, |x, y| Rgb([x as u8 * 40, y as u8 * 40, 90]));
        let file = File::create(path).unwrap();
        let mut encoder = PngEncoder::new(std::io::BufWriter::new(file));
        encoder.set_icc_profile(profile.to_vec()).unwrap();
        encoder
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
    }

    fn read_icc_profile(path: &Path) -> Option<Vec<u8>> {
        let mut decoder = open_reader(path).unwrap().into_decoder().unwrap();
        decoder.icc_profile().unwrap()
    }

    #[test]
    fn resize_keeps_icc_profile_for_png() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("p3-icon.png");
        let profile = vec![7u8; 200];
        create_png_with_icc(&source, 4, 4, &profile);
        let output = tmp.path().join("p3-icon-2.png");

        RustBackend::new()
            .resize(&params(source, output.clone(), 2, 2))
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (2, 2));
        assert_eq!(read_icc_profile(&output), Some(profile));
    }

    #[test]
    fn resize_without_icc_profile_writes_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("plain.png");
        create_test_png(&source, 8, 8);
        let output = tmp.path().join("plain-4.png");

        RustBackend::new()
            .resize(&params(source, output.clone(), 4, 4))
            .unwrap();

        assert_eq!(read_icc_profile(&output), None);
    }

    #[test]
    fn resize_icc_source_to_format_without_profiles_still_succeeds() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("p3-icon.png");
        create_png_with_icc(&source, 4, 4, &[7u8; 200]);
        let output = tmp.path().join("icon.bmp");

        RustBackend::new()
            .resize(&params(source, output.clone(), 2, 2))
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (2, 2));
    }

    #[test]
    fn resize_unsupported_format_errors_without_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("icon.png");
        create_test_png(&source, 50, 50);
        let output = tmp.path().join("out.xyz");

        let result = RustBackend::new().resize(&params(source, output.clone(), 10, 10));
        assert!(matches!(result, Err(BackendError::UnsupportedFormat(_))));
        assert!(!output.exists());
    }

    #[test]
    fn resize_undecodable_source_leaves_existing_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("broken.png");
        std::fs::write(&source, b"definitely not an image").unwrap();
        let output = tmp.path().join("out.png");
        std::fs::write(&output, b"previous contents").unwrap();

        let result = RustBackend::new().resize(&params(source, output.clone(), 10, 10));
        assert!(result.is_err());
        assert_eq!(std::fs::read(&output).unwrap(), b"previous contents");
    }

    #[test]
    fn resize_overwrites_existing_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("icon.png");
        create_test_png(&source, 64, 64);
        let output = tmp.path().join("out.png");
        std::fs::write(&output, vec![0xAB; 100_000]).unwrap();

        RustBackend::new()
            .resize(&params(source, output.clone(), 16, 16))
            .unwrap();

        assert_eq!(image::image_dimensions(&output).unwrap(), (16, 16));
        assert!(std::fs::metadata(&output).unwrap().len() < 100_000);
    }

    #[test]
    fn ico_rejects_oversized_icons() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("icon.png");
        create_test_png(&source, 64, 64);
        let output = tmp.path().join("favicon.ico");

        let result = RustBackend::new().resize(&params(source, output.clone(), 512, 512));
        assert!(matches!(result, Err(BackendError::Encode { .. })));
        assert!(!output.exists());
    }
}
