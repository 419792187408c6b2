//! Image Intake
//!
//! Validates a candidate upload (declared type and size), decodes it into an
//! RGBA bitmap and issues the preview handle that ties the decoded artwork
//! to the session. Validation is synchronous and never touches state; decode
//! failures, including bitmaps wider or taller than the GPU can sample, are
//! resource errors and leave the slot as it was.

use std::fmt;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use image::{ImageFormat, ImageReader, RgbaImage};

use super::config::IntakeConfig;
use super::error::{StudioError, StudioResult};
use super::preview::{PreviewHandle, PreviewRegistry};

/// A file offered by a picker or a drop, before validation.
#[derive(Clone)]
pub struct CandidateFile {
    pub name: String,
    /// Declared MIME type.
    pub mime: String,
    pub bytes: Arc<[u8]>,
}

impl fmt::Debug for CandidateFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a dropped file from disk; the MIME type comes from the extension.
    pub fn from_path(path: &Path) -> StudioResult<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, mime_from_path(path), bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// MIME type guessed from a file extension.
pub fn mime_from_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Check declared type and size. Touches nothing.
pub fn validate(file: &CandidateFile, config: &IntakeConfig) -> StudioResult<()> {
    let mime = file.mime.trim().to_ascii_lowercase();
    if !mime.starts_with("image/") {
        return Err(StudioError::UnsupportedType { mime: file.mime.clone() });
    }
    if file.size() > config.max_bytes {
        return Err(StudioError::FileTooLarge {
            size: file.size(),
            limit: config.max_bytes,
            limit_mb: config.max_megabytes(),
        });
    }
    Ok(())
}

/// Decode PNG or JPEG bytes into RGBA8. The header is checked against the
/// pixel ceiling before any pixels are decoded.
pub fn decode(file: &CandidateFile, config: &IntakeConfig) -> StudioResult<RgbaImage> {
    let format = image::guess_format(&file.bytes).map_err(|e| StudioError::decode(&file.name, e))?;
    if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
        return Err(StudioError::decode(
            &file.name,
            format!("{format:?} images are not supported, use PNG or JPG"),
        ));
    }

    let (width, height) = ImageReader::with_format(Cursor::new(&file.bytes[..]), format)
        .into_dimensions()
        .map_err(|e| StudioError::decode(&file.name, e))?;
    let limit = config.max_texture_dimension;
    if width > limit || height > limit {
        return Err(StudioError::ImageTooLarge { width, height, limit });
    }

    let rgba = image::load_from_memory_with_format(&file.bytes, format)
        .map_err(|e| StudioError::decode(&file.name, e))?
        .to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(StudioError::EmptyImage(file.name.clone()));
    }
    Ok(rgba)
}

/// Accepted artwork: source blob, decoded bitmap and its preview handle.
#[derive(Clone)]
pub struct UploadedArtwork {
    name: String,
    mime: String,
    source: Arc<[u8]>,
    bitmap: Arc<RgbaImage>,
    handle: PreviewHandle,
}

impl fmt::Debug for UploadedArtwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedArtwork")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("size", &self.source.len())
            .field("dimensions", &self.bitmap.dimensions())
            .field("handle", &self.handle)
            .finish()
    }
}

impl UploadedArtwork {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn size(&self) -> u64 {
        self.source.len() as u64
    }

    pub fn bitmap(&self) -> &Arc<RgbaImage> {
        &self.bitmap
    }

    pub fn handle(&self) -> PreviewHandle {
        self.handle
    }

    /// Identity of this upload; the GPU texture cache is keyed on it.
    pub fn id(&self) -> u64 {
        self.handle.id()
    }
}

/// Validate, decode and register a candidate. On error nothing is registered.
#[tracing::instrument(level = "debug", skip(config, registry), fields(name = %file.name))]
pub fn accept(
    file: CandidateFile,
    config: &IntakeConfig,
    registry: &mut PreviewRegistry,
) -> StudioResult<UploadedArtwork> {
    validate(&file, config)?;
    let bitmap = decode(&file, config)?;
    let handle = registry.create();
    tracing::info!(
        name = %file.name,
        bytes = file.size(),
        width = bitmap.width(),
        height = bitmap.height(),
        "artwork accepted"
    );
    Ok(UploadedArtwork {
        name: file.name,
        mime: file.mime,
        source: file.bytes,
        bitmap: Arc::new(bitmap),
        handle,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, image::Rgba([200, 40, 90, 255]));
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn config() -> IntakeConfig {
        IntakeConfig::default()
    }

    #[test]
    fn non_image_types_are_rejected() {
        for mime in ["text/plain", "application/pdf", "", "video/mp4"] {
            let file = CandidateFile::new("x", mime, png_bytes(2, 2));
            let err = validate(&file, &config()).unwrap_err();
            assert!(matches!(err, StudioError::UnsupportedType { .. }), "{mime}");
        }
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        let limit = IntakeConfig {
            max_bytes: 64,
            ..IntakeConfig::default()
        };
        let at = CandidateFile::new("a.png", "image/png", vec![0u8; 64]);
        let over = CandidateFile::new("b.png", "image/png", vec![0u8; 65]);
        assert!(validate(&at, &limit).is_ok());
        assert!(matches!(
            validate(&over, &limit),
            Err(StudioError::FileTooLarge { size: 65, limit: 64, .. })
        ));
    }

    #[test]
    fn mime_check_ignores_case() {
        let file = CandidateFile::new("a.png", "IMAGE/PNG", png_bytes(1, 1));
        assert!(validate(&file, &config()).is_ok());
    }

    #[test]
    fn decode_png_gives_rgba() {
        let file = CandidateFile::new("a.png", "image/png", png_bytes(3, 2));
        let rgba = decode(&file, &config()).unwrap();
        assert_eq!(rgba.dimensions(), (3, 2));
        assert_eq!(rgba.get_pixel(0, 0).0, [200, 40, 90, 255]);
    }

    #[test]
    fn decode_failure_registers_nothing() {
        let mut registry = PreviewRegistry::new();
        let file = CandidateFile::new("broken.png", "image/png", vec![0x89, b'P', b'N', b'G', 0, 0]);
        let err = accept(file, &config(), &mut registry).unwrap_err();
        assert!(matches!(err, StudioError::Decode { .. }));
        assert_eq!(registry.issued_count(), 0);
    }

    #[test]
    fn gif_is_declared_image_but_not_decodable() {
        let file = CandidateFile::new("a.gif", "image/gif", b"GIF89a\x01\x00\x01\x00".to_vec());
        assert!(validate(&file, &config()).is_ok());
        assert!(matches!(decode(&file, &config()), Err(StudioError::Decode { .. })));
    }

    #[test]
    fn pixel_ceiling_is_inclusive_on_both_axes() {
        let limit = IntakeConfig {
            max_texture_dimension: 16,
            ..IntakeConfig::default()
        };
        let at = CandidateFile::new("at.png", "image/png", png_bytes(16, 16));
        assert_eq!(decode(&at, &limit).unwrap().dimensions(), (16, 16));

        for (w, h) in [(17, 1), (1, 17)] {
            let over = CandidateFile::new("over.png", "image/png", png_bytes(w, h));
            assert!(validate(&over, &limit).is_ok());
            assert!(matches!(
                decode(&over, &limit),
                Err(StudioError::ImageTooLarge { width, height, limit: 16 }) if (width, height) == (w, h)
            ));
        }
    }

    #[test]
    fn oversized_bitmap_registers_nothing() {
        let mut registry = PreviewRegistry::new();
        let limit = IntakeConfig {
            max_texture_dimension: 8,
            ..IntakeConfig::default()
        };
        let wide = CandidateFile::new("wide.png", "image/png", png_bytes(9, 1));
        let err = accept(wide, &limit, &mut registry).unwrap_err();
        assert_eq!(err.kind(), crate::studio::ErrorKind::Resource);
        assert_eq!(registry.issued_count(), 0);
    }

    #[test]
    fn accept_issues_a_live_handle() {
        let mut registry = PreviewRegistry::new();
        let file = CandidateFile::new("logo.png", "image/png", png_bytes(4, 4));
        let artwork = accept(file, &config(), &mut registry).unwrap();
        assert_eq!(artwork.name(), "logo.png");
        assert!(registry.is_live(artwork.handle()));
        assert_eq!(artwork.bitmap().dimensions(), (4, 4));
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(mime_from_path(Path::new("a/B.PNG")), "image/png");
        assert_eq!(mime_from_path(Path::new("c.jpeg")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("c.jpg")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(mime_from_path(Path::new("noext")), "application/octet-stream");
    }
}
