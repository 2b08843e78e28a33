//! Width-driven resizing with a fixed JPEG output encoding.

use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat};

use super::decode::{decode_bytes, probe_bytes};
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult, ResizeError};

/// Every derivative is written in this format, whatever the input was.
pub const OUTPUT_FORMAT: ImageFormat = ImageFormat::Jpeg;

/// Largest width or height accepted when no config is given.
pub const DEFAULT_MAX_DIMENSION: u32 = 10_000;

const FILTER: FilterType = FilterType::Lanczos3;

/// Decodes, resamples to a target width and re-encodes as JPEG.
///
/// Sources and targets are both bounded by `max_dimension` on either axis,
/// checked before any raster is allocated.
#[derive(Debug, Clone)]
pub struct Resizer {
    quality: u8,
    max_dimension: u32,
}

impl Resizer {
    /// Create a resizer from `[resize]` quality and `[limits]` dimension cap.
    pub fn new(config: &Config) -> Self {
        Self::with_quality(config.resize.jpeg_quality)
            .with_max_dimension(config.limits.max_image_dimension)
    }

    pub fn with_quality(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }

    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.max(1);
        self
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn max_dimension(&self) -> u32 {
        self.max_dimension
    }

    /// Reject a target width of zero or above the dimension cap.
    pub fn check_width(&self, target_width: u32) -> Result<(), ResizeError> {
        if target_width == 0 || target_width > self.max_dimension {
            return Err(ResizeError::InvalidWidth(target_width));
        }
        Ok(())
    }

    /// Resize encoded image bytes to `target_width`, height following the
    /// source aspect ratio. Upscaling is allowed.
    pub fn resize(&self, bytes: &[u8], target_width: u32) -> Result<Vec<u8>, ResizeError> {
        self.check_width(target_width)?;

        let dims = probe_bytes(bytes)?;
        if dims.width > self.max_dimension || dims.height > self.max_dimension {
            return Err(ResizeError::SourceTooLarge {
                width: dims.width,
                height: dims.height,
                max: self.max_dimension,
            });
        }

        let source = decode_bytes(bytes)?;
        self.resize_image(&source, target_width)
    }

    /// Resize an already decoded raster.
    pub fn resize_image(
        &self,
        source: &DynamicImage,
        target_width: u32,
    ) -> Result<Vec<u8>, ResizeError> {
        self.check_width(target_width)?;
        let height = target_height(source.width(), source.height(), target_width);
        if height > self.max_dimension {
            return Err(ResizeError::InvalidWidth(target_width));
        }
        let resized = source.resize_exact(target_width, height, FILTER);

        // JPEG has no alpha channel
        let rgb = resized.to_rgb8();
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, self.quality)
            .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
            .map_err(|e| ResizeError::Encode(e.to_string()))?;
        Ok(buffer)
    }

    /// Run [`Resizer::resize`] on the blocking pool.
    pub async fn resize_blocking(
        &self,
        name: &str,
        bytes: Bytes,
        target_width: u32,
    ) -> PipelineResult<Vec<u8>> {
        let resizer = self.clone();
        let result = tokio::task::spawn_blocking(move || resizer.resize(&bytes, target_width))
            .await
            .map_err(|e| PipelineError::Task(format!("resize task for {name}: {e}")))?;
        result.map_err(|source| PipelineError::Resize {
            name: name.to_string(),
            source,
        })
    }
}

/// `round(target_width * source_height / source_width)`, never below 1.
pub fn target_height(source_width: u32, source_height: u32, target_width: u32) -> u32 {
    if source_width == 0 {
        return 1;
    }
    let numerator = u64::from(target_width) * u64::from(source_height);
    let width = u64::from(source_width);
    let rounded = (2 * numerator + width) / (2 * width);
    rounded.clamp(1, u64::from(u32::MAX)) as u32
}

/// Parse a caller-supplied width, rejecting zero and negatives.
pub fn validate_width(width: i64) -> PipelineResult<u32> {
    if width <= 0 {
        return Err(PipelineError::InvalidInput(format!(
            "widthSize must be a positive integer, got {width}"
        )));
    }
    u32::try_from(width)
        .map_err(|_| PipelineError::InvalidInput(format!("widthSize {width} is too large")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::decode::probe_bytes;
    use crate::pipeline::test_support::{encode_gif, encode_jpeg, encode_png, encode_rgba_png};

    #[test]
    fn test_target_height_rounding() {
        assert_eq!(target_height(1080, 1350, 32), 40);
        assert_eq!(target_height(1080, 1350, 64), 80);
        assert_eq!(target_height(200, 100, 33), 17); // 16.5 rounds up
        assert_eq!(target_height(300, 100, 10), 3); // 3.33 rounds down
        assert_eq!(target_height(10_000, 1, 10), 1);
    }

    #[test]
    fn test_resize_portrait_jpeg_to_32() {
        let resizer = Resizer::with_quality(75);
        let output = resizer.resize(&encode_jpeg(1080, 1350), 32).unwrap();

        let dims = probe_bytes(&output).unwrap();
        assert_eq!(dims.width, 32);
        assert_eq!(dims.height, 40);
    }

    #[test]
    fn test_output_is_always_jpeg() {
        let resizer = Resizer::with_quality(75);
        for input in [encode_png(50, 20), encode_gif(50, 20), encode_rgba_png(50, 20)] {
            let output = resizer.resize(&input, 25).unwrap();
            assert_eq!(&output[..3], b"\xFF\xD8\xFF");
            assert_eq!(image::guess_format(&output).unwrap(), OUTPUT_FORMAT);
        }
    }

    #[test]
    fn test_aspect_ratio_preserved_within_one_pixel() {
        let resizer = Resizer::with_quality(75);
        let (w, h) = (640u32, 427u32);
        for target in [1u32, 7, 100, 333] {
            let output = resizer.resize(&encode_png(w, h), target).unwrap();
            let dims = probe_bytes(&output).unwrap();
            assert_eq!(dims.width, target);
            let exact = f64::from(target) * f64::from(h) / f64::from(w);
            assert!((f64::from(dims.height) - exact).abs() <= 1.0);
        }
    }

    #[test]
    fn test_upscaling_is_allowed() {
        let resizer = Resizer::with_quality(75);
        let output = resizer.resize(&encode_png(10, 5), 40).unwrap();
        let dims = probe_bytes(&output).unwrap();
        assert_eq!((dims.width, dims.height), (40, 20));
    }

    #[test]
    fn test_resize_is_deterministic() {
        let resizer = Resizer::with_quality(75);
        let input = encode_jpeg(300, 200);
        let first = resizer.resize(&input, 64).unwrap();
        let second = resizer.resize(&input, 64).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_width_fails() {
        let resizer = Resizer::with_quality(75);
        let err = resizer.resize(&encode_png(10, 10), 0).unwrap_err();
        assert!(matches!(err, ResizeError::InvalidWidth(0)));
    }

    #[test]
    fn test_non_image_fails_with_decode_error() {
        let resizer = Resizer::with_quality(75);
        let err = resizer.resize(b"just some text", 32).unwrap_err();
        assert!(matches!(err, ResizeError::Decode(_)));
    }

    #[test]
    fn test_validate_width() {
        assert_eq!(validate_width(32).unwrap(), 32);
        assert!(matches!(
            validate_width(0),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            validate_width(-5),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(validate_width(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(Resizer::with_quality(0).quality(), 1);
        assert_eq!(Resizer::with_quality(255).quality(), 100);
        let resizer = Resizer::new(&Config::default());
        assert_eq!(resizer.quality(), 75);
        assert_eq!(resizer.max_dimension(), 10_000);
    }

    #[test]
    fn test_width_over_dimension_cap_is_rejected_before_resampling() {
        let resizer = Resizer::with_quality(75);
        let err = resizer.resize(&encode_png(8, 8), 1_000_000).unwrap_err();
        assert!(matches!(err, ResizeError::InvalidWidth(1_000_000)));
        assert!(resizer.check_width(DEFAULT_MAX_DIMENSION).is_ok());
        assert!(resizer.check_width(DEFAULT_MAX_DIMENSION + 1).is_err());
    }

    #[test]
    fn test_derived_height_over_cap_is_rejected() {
        // 1x50 source at width 40 would need a height of 2000
        let resizer = Resizer::with_quality(75).with_max_dimension(100);
        let err = resizer.resize(&encode_png(1, 50), 40).unwrap_err();
        assert!(matches!(err, ResizeError::InvalidWidth(40)));

        let ok = resizer.resize(&encode_png(1, 50), 2).unwrap();
        assert_eq!(probe_bytes(&ok).unwrap().height, 100);
    }

    #[test]
    fn test_oversized_source_is_rejected() {
        let resizer = Resizer::with_quality(75).with_max_dimension(32);
        let err = resizer.resize(&encode_png(64, 16), 16).unwrap_err();
        assert!(matches!(
            err,
            ResizeError::SourceTooLarge {
                width: 64,
                height: 16,
                max: 32
            }
        ));
    }

    #[tokio::test]
    async fn test_resize_blocking_rejects_huge_width() {
        let resizer = Resizer::with_quality(75);
        let err = resizer
            .resize_blocking("tiny.png", Bytes::from(encode_png(8, 8)), 1_000_000)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Resize {
                source: ResizeError::InvalidWidth(1_000_000),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_resize_blocking_wraps_errors_with_name() {
        let resizer = Resizer::with_quality(75);
        let err = resizer
            .resize_blocking("notes.txt", Bytes::from_static(b"plain"), 32)
            .await
            .unwrap_err();
        match err {
            PipelineError::Resize { name, .. } => assert_eq!(name, "notes.txt"),
            other => panic!("unexpected error: {other}"),
        }

        let ok = resizer
            .resize_blocking("a.png", Bytes::from(encode_png(20, 10)), 10)
            .await
            .unwrap();
        assert_eq!(probe_bytes(&ok).unwrap().height, 5);
    }
}
