//! Media file-extension knowledge.
//!
//! The equivalence groups are intentionally coarse (any raster format can
//! stand in for any other, likewise video containers): export tools
//! re-encode media at download time often enough that a strict extension
//! match loses files that are sitting right there on disk. The
//! over-matching this allows is a known trade-off, kept deliberately.

/// Raster image formats the export tools are known to produce. One
/// equivalence group: a file under any of these can substitute for a
/// reference to any other.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpeg", "jpg", "png", "webp", "gif", "bmp", "tiff", "svg", "heic", "avif", "jfif", "apng", "ico",
];

/// Video container formats, the second equivalence group.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mkv", "flv", "wmv", "webm", "mpeg", "mpg", "3gp", "ogg", "m4v",
];

/// Every extension that counts as "media".
pub fn all_media_extensions() -> impl Iterator<Item = &'static str> {
    IMAGE_EXTENSIONS.iter().chain(VIDEO_EXTENSIONS.iter()).copied()
}

/// The equivalence group an extension belongs to, or empty for
/// non-media extensions.
pub fn alternative_extensions(extension: &str) -> &'static [&'static str] {
    let lowered = extension.to_ascii_lowercase();
    for group in [IMAGE_EXTENSIONS, VIDEO_EXTENSIONS] {
        if group.contains(&lowered.as_str()) {
            return group;
        }
    }
    &[]
}

/// The filename itself, followed by its spelling under every equivalent
/// extension. Extensionless names widen to nothing.
pub fn alternative_file_names(file_name: &str) -> Vec<String> {
    let Some(dot) = file_name.rfind('.') else {
        return vec![file_name.to_string()];
    };
    let stem = &file_name[..dot];
    let extension = &file_name[dot + 1..];
    std::iter::once(file_name.to_string())
        .chain(alternative_extensions(extension).iter().map(|ext| format!("{stem}.{ext}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_do_not_cross() {
        assert!(alternative_extensions("JPG").contains(&"png"));
        assert!(!alternative_extensions("jpg").contains(&"mp4"));
        assert!(alternative_extensions("mov").contains(&"webm"));
        assert!(alternative_extensions("txt").is_empty());
    }

    #[test]
    fn file_names_widen_within_their_group() {
        let names = alternative_file_names("photo_1280.jpg");
        assert_eq!(names[0], "photo_1280.jpg");
        assert!(names.contains(&"photo_1280.webp".to_string()));
        assert!(!names.contains(&"photo_1280.mp4".to_string()));
    }

    #[test]
    fn extensionless_names_pass_through() {
        assert_eq!(alternative_file_names("README"), vec!["README".to_string()]);
    }
}
