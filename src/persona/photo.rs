use std::path::Path;

use thiserror::Error;

use crate::llm::media::{detect_mime_type, encode_data_url};

/// Extensions offered by the upload picker.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhotoError {
    #[error("업로드된 파일이 비어 있습니다.")]
    Empty,
    #[error("지원하지 않는 파일 형식입니다 ({0}). jpg, jpeg, png 파일만 업로드할 수 있습니다.")]
    UnsupportedExtension(String),
    #[error("파일이 너무 큽니다 ({size} bytes, 최대 {limit} bytes).")]
    TooLarge { size: usize, limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhotoMime {
    Png,
    Jpeg,
    Webp,
}

impl PhotoMime {
    pub fn as_str(self) -> &'static str {
        match self {
            PhotoMime::Png => "image/png",
            PhotoMime::Jpeg => "image/jpeg",
            PhotoMime::Webp => "image/webp",
        }
    }

    /// JPEG and WebP are kept as declared; every other type is sent as PNG.
    pub fn from_declared(mime_type: &str) -> Self {
        match mime_type.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => PhotoMime::Jpeg,
            "image/webp" => PhotoMime::Webp,
            _ => PhotoMime::Png,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPhoto {
    pub bytes: Vec<u8>,
    pub mime: PhotoMime,
    pub file_name: Option<String>,
}

impl UserPhoto {
    #[cfg(test)]
    pub fn new(bytes: Vec<u8>, mime: PhotoMime) -> Self {
        Self {
            bytes,
            mime,
            file_name: None,
        }
    }

    /// Validates an uploaded file. The declared content type wins; when the
    /// browser sent none the bytes are sniffed.
    pub fn from_upload(
        bytes: Vec<u8>,
        declared_mime: Option<&str>,
        file_name: Option<&str>,
        max_bytes: usize,
    ) -> Result<Self, PhotoError> {
        if bytes.is_empty() {
            return Err(PhotoError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(PhotoError::TooLarge {
                size: bytes.len(),
                limit: max_bytes,
            });
        }

        if let Some(name) = file_name {
            let extension = Path::new(name)
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.to_ascii_lowercase())
                .unwrap_or_default();
            if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
                return Err(PhotoError::UnsupportedExtension(name.to_string()));
            }
        }

        let mime = match declared_mime.filter(|value| !value.trim().is_empty()) {
            Some(declared) => PhotoMime::from_declared(declared),
            None => detect_mime_type(&bytes)
                .map(|sniffed| PhotoMime::from_declared(&sniffed))
                .unwrap_or(PhotoMime::Png),
        };

        Ok(Self {
            bytes,
            mime,
            file_name: file_name.map(str::to_string),
        })
    }

    pub fn data_url(&self) -> String {
        encode_data_url(self.mime.as_str(), &self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn declared_type_maps_to_supported_mime() {
        assert_eq!(PhotoMime::from_declared("image/jpeg"), PhotoMime::Jpeg);
        assert_eq!(PhotoMime::from_declared("IMAGE/WEBP"), PhotoMime::Webp);
        assert_eq!(PhotoMime::from_declared("image/png"), PhotoMime::Png);
        assert_eq!(PhotoMime::from_declared("application/octet-stream"), PhotoMime::Png);
    }

    #[test]
    fn sniffs_when_no_type_declared() {
        let photo = UserPhoto::from_upload(JPEG_MAGIC.to_vec(), None, Some("me.JPG"), 1024).unwrap();
        assert_eq!(photo.mime, PhotoMime::Jpeg);
        assert!(photo.data_url().starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn rejects_extension_outside_picker_filter() {
        let err = UserPhoto::from_upload(JPEG_MAGIC.to_vec(), None, Some("me.gif"), 1024).unwrap_err();
        assert_eq!(err, PhotoError::UnsupportedExtension("me.gif".to_string()));
    }

    #[test]
    fn rejects_empty_and_oversized_uploads() {
        assert_eq!(
            UserPhoto::from_upload(Vec::new(), Some("image/png"), Some("a.png"), 10).unwrap_err(),
            PhotoError::Empty
        );
        assert_eq!(
            UserPhoto::from_upload(vec![0; 11], Some("image/png"), Some("a.png"), 10).unwrap_err(),
            PhotoError::TooLarge { size: 11, limit: 10 }
        );
    }
}
