//! Content-based image detection from magic bytes.
//!
//! Only a byte prefix is inspected, nothing is decoded. This runs before any
//! decode so CPU is never spent on payloads that cannot be images.

use std::io::Read;
use std::path::Path;

/// Image encodings recognized by their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::Gif => "image/gif",
        }
    }

    /// Canonical file extension for the kind.
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Gif => "gif",
        }
    }
}

static SIGNATURES: &[(&[u8], ImageKind)] = &[
    (b"\xFF\xD8\xFF", ImageKind::Jpeg),
    (b"\x89PNG\r\n\x1A\n", ImageKind::Png),
    (b"GIF87a", ImageKind::Gif),
    (b"GIF89a", ImageKind::Gif),
];

/// Length of the longest signature; reading this many bytes is always enough.
pub const MAX_SIGNATURE_LEN: usize = 8;

/// Which signature, if any, the prefix starts with.
///
/// Inputs shorter than a signature simply fail that signature.
pub fn detect(prefix: &[u8]) -> Option<ImageKind> {
    SIGNATURES
        .iter()
        .find(|(magic, _)| prefix.starts_with(magic))
        .map(|(_, kind)| *kind)
}

/// True iff the bytes start with a recognized image signature.
pub fn is_image(prefix: &[u8]) -> bool {
    detect(prefix).is_some()
}

/// Classify a file on disk by reading only its first bytes.
pub fn classify_file(path: &Path) -> std::io::Result<Option<ImageKind>> {
    let file = std::fs::File::open(path)?;
    let mut header = Vec::with_capacity(MAX_SIGNATURE_LEN);
    file.take(MAX_SIGNATURE_LEN as u64).read_to_end(&mut header)?;
    Ok(detect(&header))
}
