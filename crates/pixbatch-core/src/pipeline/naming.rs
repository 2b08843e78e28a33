//! Output naming for accepted images.
//!
//! Pure functions, no I/O. Two schemes:
//! - `"<uuid>.<ext>"` for uploads and archive entries (`a.jpg` → `1f0c…e9.jpg`)
//! - `"<parent>/<width>x<file>"` for a thumbnail of a stored image
//!   (`images/a.jpg` at 32 → `images/32xa.jpg`)

use std::path::Path;
use uuid::Uuid;

/// Extension of the final path component, without the dot.
///
/// `None` when the name has no extension (`README`, `.bashrc`, `dir/`).
pub fn extension(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
}

/// Fresh random name carrying the original extension.
pub fn unique_name(original: &str) -> String {
    let token = Uuid::new_v4();
    match extension(original) {
        Some(ext) => format!("{token}.{ext}"),
        None => token.to_string(),
    }
}

/// Sibling location of `source` named `<width>x<file name>`.
pub fn sized_location(source: &str, width: u32) -> String {
    let path = Path::new(source);
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sized = format!("{width}x{file_name}");

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            parent.join(sized).to_string_lossy().into_owned()
        }
        _ => sized,
    }
}
