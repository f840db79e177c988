//! Inline image payloads
//!
//! Images travel as self-describing data URIs
//! (`data:image/<subtype>;base64,<payload>`) and are split into media type
//! and base64 data before being attached to a model request.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::path::Path;
use tracing::debug;

use crate::error::CopyError;

/// Largest image accepted for inline upload (Gemini inline data limit)
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Image content plus its media type, owned by a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl ImagePayload {
    /// Split a data URI into media type and payload.
    ///
    /// Only `image/<letters>` media types with base64 encoding are accepted.
    pub fn from_data_uri(uri: &str) -> Result<Self, CopyError> {
        let invalid = || CopyError::InvalidInput("Invalid Base64 image format".to_string());

        let rest = uri.strip_prefix("data:").ok_or_else(invalid)?;
        let (mime_type, data) = rest.split_once(";base64,").ok_or_else(invalid)?;

        let subtype = mime_type.strip_prefix("image/").ok_or_else(invalid)?;
        if subtype.is_empty() || !subtype.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        if data.contains(['\n', '\r']) {
            return Err(invalid());
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    /// Load an image file, enforcing the inline size limit
    pub fn from_file(path: &Path) -> Result<Self, CopyError> {
        let mime_type = mime_type_for_path(path).ok_or_else(|| {
            CopyError::InvalidInput(format!(
                "Unsupported image type: {} (use PNG, JPEG or WEBP)",
                path.display()
            ))
        })?;

        let bytes = std::fs::read(path).map_err(|e| {
            CopyError::InvalidInput(format!("Failed to read image {}: {}", path.display(), e))
        })?;

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(CopyError::InvalidInput(format!(
                "Image is too large ({} bytes). Choose an image smaller than 4MB.",
                bytes.len()
            )));
        }

        debug!("Loaded image {} ({} bytes, {})", path.display(), bytes.len(), mime_type);

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: STANDARD.encode(&bytes),
        })
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use proptest::prelude::*;
    use std::io::Write;

    #[test]
    fn test_from_data_uri_valid() {
        let payload = ImagePayload::from_data_uri("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data, "iVBORw0KGgo=");
    }

    #[test]
    fn test_from_data_uri_rejects_other_shapes() {
        for uri in [
            "iVBORw0KGgo=",
            "data:image/png,iVBORw0KGgo=",
            "data:text/plain;base64,aGVsbG8=",
            "data:image/svg+xml;base64,PHN2Zz4=",
            "data:image/;base64,AAAA",
            "https://example.com/produto.png",
        ] {
            let err = ImagePayload::from_data_uri(uri).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{}", uri);
        }
    }

    #[test]
    fn test_from_file_encodes_and_detects_type() {
        let mut file = tempfile::Builder::new().suffix(".JPG").tempfile().unwrap();
        file.write_all(b"\xFF\xD8\xFFjpeg").unwrap();

        let payload = ImagePayload::from_file(file.path()).unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!(STANDARD.decode(&payload.data).unwrap(), b"\xFF\xD8\xFFjpeg");
        assert_eq!(ImagePayload::from_data_uri(&payload.to_data_uri()).unwrap(), payload);
    }

    #[test]
    fn test_from_file_rejects_oversized_image() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&vec![0u8; MAX_IMAGE_BYTES + 1]).unwrap();

        let err = ImagePayload::from_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_from_file_rejects_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".gif").tempfile().unwrap();
        let err = ImagePayload::from_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    proptest! {
        #[test]
        fn prop_well_formed_uri_splits(subtype in "[a-zA-Z]{1,8}", data in "[A-Za-z0-9+/=]{0,64}") {
            let uri = format!("data:image/{};base64,{}", subtype, data);
            let payload = ImagePayload::from_data_uri(&uri).unwrap();
            prop_assert_eq!(payload.mime_type, format!("image/{}", subtype));
            prop_assert_eq!(payload.data, data);
        }
    }
}
