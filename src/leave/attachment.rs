//! Supporting document for a leave request.

use std::path::Path;

use thiserror::Error;

/// Upper bound on the uploaded document size.
pub const MAX_ATTACHMENT_BYTES: usize = 2 * 1024 * 1024;

/// Extensions the server accepts, lowercase.
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["pdf", "doc", "docx", "jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum AttachmentError {
    #[error("File type '.{0}' is not allowed (use PDF, DOC, DOCX, JPG or PNG)")]
    UnsupportedType(String),

    #[error("File is too large ({size} bytes, maximum is 2 MB)")]
    TooLarge { size: usize },

    #[error("Could not read file: {0}")]
    Read(#[from] std::io::Error),
}

/// A validated document ready to upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Read and validate a file picked by the user.
    pub fn from_path(path: &Path) -> Result<Self, AttachmentError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        mime_for(&file_name)?;

        // Check the size before reading the whole file into memory.
        let size = std::fs::metadata(path)?.len() as usize;
        if size > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge { size });
        }

        let bytes = std::fs::read(path)?;
        Self::from_bytes(file_name, bytes)
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AttachmentError> {
        let file_name = file_name.into();
        let mime_type = mime_for(&file_name)?;
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(AttachmentError::TooLarge { size: bytes.len() });
        }
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }
}

fn mime_for(file_name: &str) -> Result<&'static str, AttachmentError> {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => return Err(AttachmentError::UnsupportedType(ext)),
    };
    Ok(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_by_extension() {
        let a = Attachment::from_bytes("note.PDF", vec![1, 2, 3]).unwrap();
        assert_eq!(a.mime_type, "application/pdf");
        let a = Attachment::from_bytes("scan.jpeg", vec![]).unwrap();
        assert_eq!(a.mime_type, "image/jpeg");
    }

    #[test]
    fn test_rejects_unknown_type() {
        let err = Attachment::from_bytes("virus.exe", vec![0]).unwrap_err();
        assert!(matches!(err, AttachmentError::UnsupportedType(ext) if ext == "exe"));
        assert!(Attachment::from_bytes("README", vec![0]).is_err());
    }

    #[test]
    fn test_size_limit() {
        assert!(Attachment::from_bytes("a.png", vec![0; MAX_ATTACHMENT_BYTES]).is_ok());
        let err = Attachment::from_bytes("a.png", vec![0; MAX_ATTACHMENT_BYTES + 1]).unwrap_err();
        assert!(matches!(err, AttachmentError::TooLarge { .. }));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certificate.docx");
        std::fs::write(&path, b"hello").unwrap();

        let a = Attachment::from_path(&path).unwrap();
        assert_eq!(a.file_name, "certificate.docx");
        assert_eq!(a.bytes, b"hello");

        let big = dir.path().join("big.pdf");
        std::fs::write(&big, vec![0u8; MAX_ATTACHMENT_BYTES + 10]).unwrap();
        assert!(matches!(Attachment::from_path(&big), Err(AttachmentError::TooLarge { .. })));
    }
}
