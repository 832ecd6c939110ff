//! Uploaded-file records carried by the request descriptor.

/// A file already spooled to disk by the front-end parser.
///
/// The descriptor carries only the spool location and byte count; the
/// body itself never crosses this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIncoming {
    /// Path of the temporary file holding the upload
    pub temp_path: String,
    /// Upload size in bytes
    pub size: u64,
}

impl FileIncoming {
    pub fn new(temp_path: impl Into<String>, size: u64) -> Self {
        Self {
            temp_path: temp_path.into(),
            size,
        }
    }
}
