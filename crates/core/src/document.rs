//! The spec document moved between the fetch and upload stages.

/// Raw file content plus the filename the vector store uses for type detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
}

impl SpecDocument {
    pub fn new(bytes: impl Into<Vec<u8>>, filename: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
        }
    }

    /// Number of bytes in the document.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
