//! Document intake
//!
//! Converts an uploaded file into the transportable base64 form the
//! generation API expects. One file per invocation; MIME acceptance is
//! advisory and not enforced here.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An uploaded document held in its transportable encoded form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub name: String,
    pub mime_type: String,
    /// Original size in bytes
    pub size: usize,
    /// Base64 payload, possibly carrying a data-URL prefix
    pub data: String,
}

impl UploadedDocument {
    /// Encode raw file bytes into a document payload
    pub fn from_bytes(name: &str, mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size: bytes.len(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// The base64 payload with any `data:...;base64,` prefix stripped
    ///
    /// Browser file readers hand back data URLs; the generation API wants
    /// the bare payload.
    pub fn clean_base64(&self) -> &str {
        match self.data.find("base64,") {
            Some(idx) => &self.data[idx + "base64,".len()..],
            None => &self.data,
        }
    }

    /// Decode the payload back to raw bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.clean_base64())
            .map_err(|e| Error::FileRead(format!("invalid base64 payload: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_roundtrip() {
        let doc = UploadedDocument::from_bytes("receipt.jpg", "image/jpeg", b"hello");
        assert_eq!(doc.size, 5);
        assert_eq!(doc.decode().unwrap(), b"hello");
    }

    #[test]
    fn test_clean_base64_strips_data_url_prefix() {
        let mut doc = UploadedDocument::from_bytes("receipt.png", "image/png", b"abc");
        let bare = doc.data.clone();
        doc.data = format!("data:image/png;base64,{}", bare);
        assert_eq!(doc.clean_base64(), bare);
        assert_eq!(doc.decode().unwrap(), b"abc");
    }

    #[test]
    fn test_clean_base64_passthrough_without_prefix() {
        let doc = UploadedDocument::from_bytes("a.pdf", "application/pdf", b"%PDF");
        assert_eq!(doc.clean_base64(), doc.data);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let doc = UploadedDocument {
            name: "x".into(),
            mime_type: "image/jpeg".into(),
            size: 0,
            data: "not base64 at all!!".into(),
        };
        assert!(matches!(doc.decode(), Err(Error::FileRead(_))));
    }
}
