use std::path::Path;

/// Direction of a step port, as seen from the step that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortPredicate {
    Uses,
    Provides,
}

/// Outcome of checking an identifier in the configuration dialog.
///
/// The dialog collapses this to a single boolean, but the variant drives
/// the error styling shown next to the identifier field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentifierStatus {
    #[default]
    Empty,
    Duplicate,
    Unique,
}

impl IdentifierStatus {
    pub fn is_valid(self) -> bool {
        matches!(self, IdentifierStatus::Unique)
    }
}

/// How files found in a directory are ordered into frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameOrder {
    /// `img2` before `img10`.
    #[default]
    Natural,
    /// Plain byte-wise path order.
    Lexical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Tiff,
    Bmp,
    Gif,
    Dicom,
}

impl ImageFormat {
    pub const SUPPORTED_EXTENSIONS: [&'static str; 8] =
        ["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "dcm"];

    pub fn from_extension(extension: &str) -> Option<Self> {
        let format = match extension.to_ascii_lowercase().as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "tif" | "tiff" => ImageFormat::Tiff,
            "bmp" => ImageFormat::Bmp,
            "gif" => ImageFormat::Gif,
            "dcm" => ImageFormat::Dicom,
            _ => return None,
        };
        Some(format)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_supported_extensions_case_insensitively() {
        assert_eq!(
            ImageFormat::from_path(Path::new("scan/frame_01.PNG")),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_path(Path::new("a.jpeg")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_path(Path::new("slice.dcm")),
            Some(ImageFormat::Dicom)
        );
        assert_eq!(ImageFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(ImageFormat::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn every_declared_extension_maps_to_a_format() {
        for extension in ImageFormat::SUPPORTED_EXTENSIONS {
            assert!(ImageFormat::from_extension(extension).is_some(), "{extension}");
        }
    }
}
