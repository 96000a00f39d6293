use super::tags::{
    get_int_value, get_non_empty_string, INSTANCE_NUMBER, MEDIA_STORAGE_DIRECTORY_STORAGE,
    MEDIA_STORAGE_SOP_CLASS_UID, PATIENT_ID, SERIES_INSTANCE_UID, SOP_INSTANCE_UID,
    STUDY_INSTANCE_UID,
};
use super::{to_lines, Dataset};
use std::path::PathBuf;

/// Whether file meta information describes a DICOMDIR
pub fn is_directory_index(meta: &Dataset) -> bool {
    get_non_empty_string(meta, MEDIA_STORAGE_SOP_CLASS_UID)
        .map(|uid| uid.trim_end_matches('\0') == MEDIA_STORAGE_DIRECTORY_STORAGE)
        .unwrap_or(false)
}

/// The four identifiers placing an instance in the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    pub patient_id: String,
    pub study_instance_uid: String,
    pub series_instance_uid: String,
    pub sop_instance_uid: String,
}

impl InstanceKey {
    /// Reads the identifiers from a data set
    ///
    /// # Errors
    ///
    /// Returns the keyword of the first identifier that is missing or empty
    pub fn from_dataset(ds: &Dataset) -> std::result::Result<Self, &'static str> {
        let read = |tag, keyword| get_non_empty_string(ds, tag).ok_or(keyword);

        Ok(Self {
            patient_id: read(PATIENT_ID, "PatientID")?,
            study_instance_uid: read(STUDY_INSTANCE_UID, "StudyInstanceUID")?,
            series_instance_uid: read(SERIES_INSTANCE_UID, "SeriesInstanceUID")?,
            sop_instance_uid: read(SOP_INSTANCE_UID, "SOPInstanceUID")?,
        })
    }
}

/// One decoded file: file-meta group plus main data set
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceRecord {
    /// Source file, if the record was loaded from disk
    pub file_path: Option<PathBuf>,

    /// Hierarchy identifiers
    pub key: InstanceKey,

    /// File meta information (group 0002)
    pub meta: Dataset,

    /// Main data set
    pub dataset: Dataset,
}

impl InstanceRecord {
    /// Builds a record, deriving its identifiers from the main data set
    pub fn new(meta: Dataset, dataset: Dataset) -> std::result::Result<Self, &'static str> {
        let key = InstanceKey::from_dataset(&dataset)?;
        Ok(Self {
            file_path: None,
            key,
            meta,
            dataset,
        })
    }

    pub fn with_file_path(mut self, path: PathBuf) -> Self {
        self.file_path = Some(path);
        self
    }

    pub fn sop_instance_uid(&self) -> &str {
        &self.key.sop_instance_uid
    }

    /// InstanceNumber, 1 when absent
    pub fn instance_number(&self) -> i32 {
        get_int_value(&self.dataset, INSTANCE_NUMBER).unwrap_or(1)
    }

    /// Number of fields in both data sets, nested ones included
    pub fn total_len(&self) -> usize {
        self.meta.total_len() + self.dataset.total_len()
    }

    /// Text projection handed to the diff renderer: file meta first
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = to_lines(&self.meta);
        lines.extend(to_lines(&self.dataset));
        lines
    }
}
