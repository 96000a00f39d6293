use std::path::PathBuf;
use thiserror::Error;

/// Result type for dcmdiff operations
pub type Result<T> = std::result::Result<T, DcmdiffError>;

/// Error types for dcmdiff operations
///
/// Every variant is fatal for a run. A reference series or instance without
/// a counterpart on the test side is not an error and never shows up here.
#[derive(Error, Debug)]
pub enum DcmdiffError {
    /// Input path is neither a file nor a directory
    #[error("{} is neither a file or directory", .0.display())]
    InvalidPath(PathBuf),

    /// No usable DICOM records below an input path
    #[error("No valid DICOM files found in {}", .0.display())]
    NoDicomFiles(PathBuf),

    /// Decoded file lacks one of the hierarchy identifiers
    #[error("{}: missing {keyword}", .path.display())]
    MissingIdentifier { path: PathBuf, keyword: &'static str },

    /// Tag-list file does not exist
    #[error("{} does not exist", .0.display())]
    TagFileMissing(PathBuf),

    /// Tag-list file yielded no usable tags
    #[error("no tags found in {}", .0.display())]
    EmptyTagFile(PathBuf),

    /// Unparseable tag keyword or group/element pair
    #[error("Unable to create an element tag from '{0}'")]
    InvalidTag(String),

    /// Unparseable hexadecimal group number
    #[error("Invalid group number: '{0}'")]
    InvalidGroup(String),

    /// Unknown value representation code
    #[error("Invalid value representation: '{0}'")]
    InvalidVr(String),

    /// Interactive answer that does not name one of the offered entries
    #[error("Invalid selection '{input}': expected an index between 0 and {}", .count.saturating_sub(1))]
    InvalidSelection { input: String, count: usize },

    /// Nothing to select at a level where a selection is mandatory
    #[error("No {0} available for selection")]
    NoCandidates(&'static str),

    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<dicom_object::ReadError> for DcmdiffError {
    fn from(e: dicom_object::ReadError) -> Self {
        DcmdiffError::DicomError(format!("{}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DcmdiffError::InvalidTag("EchTime".to_string());
        assert_eq!(
            err.to_string(),
            "Unable to create an element tag from 'EchTime'"
        );

        let err = DcmdiffError::InvalidSelection {
            input: "7".to_string(),
            count: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid selection '7': expected an index between 0 and 2"
        );
    }
}
