//! MIME type detection for uploaded images.
//!
//! Signature sniffing first, then a fixed extension table. Resolution never
//! fails: an unrecognizable file still gets a best-guess image type.

use std::path::Path;

use tracing::debug;

/// Bytes of header inspected by [`detect_image_format`].
const HEADER_LEN: usize = 32;

/// Resolve the MIME type of an image already read into memory.
///
/// Returns `image/<format>` when the header matches a known signature,
/// otherwise the extension-table guess for `path` from [`mime_from_extension`].
pub fn resolve_image_mime(path: &Path, data: &[u8]) -> String {
    let header = &data[..data.len().min(HEADER_LEN)];
    match detect_image_format(header) {
        Some(format) => format!("image/{format}"),
        None => {
            let mime = mime_from_extension(path);
            debug!(path = %path.display(), mime, "No image signature, using extension");
            mime.to_string()
        }
    }
}

/// Identify an image format from its leading bytes.
///
/// Format names are the MIME subtypes reported by [`resolve_image_mime`].
pub fn detect_image_format(h: &[u8]) -> Option<&'static str> {
    let netpbm = |digits: &[u8]| {
        h.len() >= 3 && h[0] == b'P' && digits.contains(&h[1]) && b" \t\n\r".contains(&h[2])
    };

    if matches!(h.get(6..10), Some(b"JFIF") | Some(b"Exif"))
        || h.starts_with(&[0xFF, 0xD8, 0xFF, 0xDB])
    {
        Some("jpeg")
    } else if h.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if h.starts_with(b"GIF87a") || h.starts_with(b"GIF89a") {
        Some("gif")
    } else if h.starts_with(b"MM") || h.starts_with(b"II") {
        Some("tiff")
    } else if h.starts_with(&[0x01, 0xDA]) {
        Some("rgb")
    } else if netpbm(b"14") {
        Some("pbm")
    } else if netpbm(b"25") {
        Some("pgm")
    } else if netpbm(b"36") {
        Some("ppm")
    } else if h.starts_with(&[0x59, 0xA6, 0x6A, 0x95]) {
        Some("rast")
    } else if h.starts_with(b"#define ") {
        Some("xbm")
    } else if h.starts_with(b"BM") {
        Some("bmp")
    } else if h.starts_with(b"RIFF") && h.get(8..12) == Some(&b"WEBP"[..]) {
        Some("webp")
    } else if h.starts_with(&[0x76, 0x2F, 0x31, 0x01]) {
        Some("exr")
    } else {
        None
    }
}

/// Fallback table for images whose signature was not recognized.
pub fn mime_from_extension(path: &Path) -> &'static str {
    match lowercase_extension(path).as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "image/jpeg",
    }
}

fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JFIF: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF\0";
    const WEBP: &[u8] = b"RIFF\x24\0\0\0WEBPVP8 ";

    #[test]
    fn detects_common_signatures() {
        assert_eq!(detect_image_format(PNG), Some("png"));
        assert_eq!(detect_image_format(JFIF), Some("jpeg"));
        assert_eq!(detect_image_format(b"\xFF\xD8\xFF\xDB\0\0"), Some("jpeg"));
        assert_eq!(detect_image_format(b"GIF89a\x01\0"), Some("gif"));
        assert_eq!(detect_image_format(WEBP), Some("webp"));
        assert_eq!(detect_image_format(b"BM\0\0"), Some("bmp"));
        assert_eq!(detect_image_format(b"P6\n640 480"), Some("ppm"));
    }

    #[test]
    fn riff_without_webp_tag_is_unknown() {
        assert_eq!(detect_image_format(b"RIFF\0\0\0\0WAVEfmt "), None);
        assert_eq!(detect_image_format(b"RIFF"), None);
    }

    #[test]
    fn unknown_bytes_are_undetected() {
        assert_eq!(detect_image_format(b"hello world"), None);
        assert_eq!(detect_image_format(&[]), None);
    }

    #[test]
    fn extension_table_covers_supported_types() {
        assert_eq!(mime_from_extension(&PathBuf::from("a.png")), "image/png");
        assert_eq!(mime_from_extension(&PathBuf::from("a.JPG")), "image/jpeg");
        assert_eq!(mime_from_extension(&PathBuf::from("a.jpeg")), "image/jpeg");
        assert_eq!(mime_from_extension(&PathBuf::from("a.gif")), "image/gif");
        assert_eq!(mime_from_extension(&PathBuf::from("a.WebP")), "image/webp");
    }

    #[test]
    fn unsupported_extension_defaults_to_jpeg() {
        assert_eq!(mime_from_extension(&PathBuf::from("a.heic")), "image/jpeg");
        assert_eq!(mime_from_extension(&PathBuf::from("noext")), "image/jpeg");
    }

    #[test]
    fn resolve_prefers_signature_over_extension() {
        assert_eq!(resolve_image_mime(Path::new("mislabeled.jpg"), PNG), "image/png");
    }

    #[test]
    fn resolve_falls_back_to_extension_for_garbage() {
        for (name, expected) in [
            ("scan.png", "image/png"),
            ("scan.gif", "image/gif"),
            ("scan.webp", "image/webp"),
            ("scan.jpeg", "image/jpeg"),
            ("scan.dat", "image/jpeg"),
        ] {
            assert_eq!(
                resolve_image_mime(Path::new(name), b"not really an image"),
                expected,
                "{name}"
            );
        }
    }

    #[test]
    fn resolve_empty_data_uses_extension() {
        assert_eq!(resolve_image_mime(Path::new("page.webp"), &[]), "image/webp");
    }

    #[test]
    fn signature_past_header_window_is_ignored() {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(PNG);
        assert_eq!(resolve_image_mime(Path::new("page.gif"), &data), "image/gif");
    }
}
