use super::Dataset;
use dicom_core::Tag;

// File Meta Tags
pub const FILE_META_INFORMATION_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
pub const FILE_META_INFORMATION_VERSION: Tag = Tag(0x0002, 0x0001);
pub const MEDIA_STORAGE_SOP_CLASS_UID: Tag = Tag(0x0002, 0x0002);
pub const MEDIA_STORAGE_SOP_INSTANCE_UID: Tag = Tag(0x0002, 0x0003);
pub const TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);
pub const IMPLEMENTATION_CLASS_UID: Tag = Tag(0x0002, 0x0012);
pub const IMPLEMENTATION_VERSION_NAME: Tag = Tag(0x0002, 0x0013);
pub const SOURCE_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0016);
pub const SENDING_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0017);
pub const RECEIVING_APPLICATION_ENTITY_TITLE: Tag = Tag(0x0002, 0x0018);
pub const PRIVATE_INFORMATION_CREATOR_UID: Tag = Tag(0x0002, 0x0100);
pub const PRIVATE_INFORMATION: Tag = Tag(0x0002, 0x0102);

// Hierarchy Identification Tags
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);

// Display/Match Tags
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
pub const STUDY_TIME: Tag = Tag(0x0008, 0x0030);
pub const STUDY_DESCRIPTION: Tag = Tag(0x0008, 0x1030);
pub const MODALITY: Tag = Tag(0x0008, 0x0060);
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);

// Other Tags
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
pub const REFERENCED_IMAGE_SEQUENCE: Tag = Tag(0x0008, 0x1140);
pub const REFERENCED_SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x1155);
pub const REPETITION_TIME: Tag = Tag(0x0018, 0x0080);
pub const ECHO_TIME: Tag = Tag(0x0018, 0x0081);
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

/// SOP class of a DICOMDIR (Media Storage Directory Storage)
pub const MEDIA_STORAGE_DIRECTORY_STORAGE: &str = "1.2.840.10008.1.3.10";

/// Helper to get string value from a data set
///
/// Returns `None` if the tag is not present or has no textual value.
/// Trailing space and null padding is stripped, leading whitespace is kept.
/// A present but empty value yields `Some("")`.
pub fn get_string_value(ds: &Dataset, tag: Tag) -> Option<String> {
    ds.get(tag).and_then(|field| field.to_str()).map(|s| {
        s.trim_end_matches(|c: char| c.is_whitespace() || c == '\0')
            .to_string()
    })
}

/// Like [`get_string_value`], but treats an empty value as absent
pub fn get_non_empty_string(ds: &Dataset, tag: Tag) -> Option<String> {
    get_string_value(ds, tag).filter(|s| !s.is_empty())
}

/// Helper to get integer value from a data set
///
/// Returns `None` if the tag is not present or cannot be converted to i32
pub fn get_int_value(ds: &Dataset, tag: Tag) -> Option<i32> {
    ds.get(tag).and_then(|field| field.to_int())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Field;
    use dicom_core::VR;

    #[test]
    fn test_tag_values() {
        assert_eq!(PATIENT_ID, Tag(0x0010, 0x0020));
        assert_eq!(SOP_INSTANCE_UID, Tag(0x0008, 0x0018));
        assert_eq!(SERIES_DESCRIPTION, Tag(0x0008, 0x103E));
        assert_eq!(INSTANCE_NUMBER, Tag(0x0020, 0x0013));
    }

    #[test]
    fn test_value_helpers() {
        let ds = Dataset::from_iter([
            Field::new(MODALITY, VR::CS, "MR "),
            Field::new(SERIES_NUMBER, VR::IS, " 10"),
            Field::new(STUDY_DESCRIPTION, VR::LO, ""),
            Field::new(SERIES_DESCRIPTION, VR::LO, " T1 axial\0"),
        ]);

        assert_eq!(get_string_value(&ds, MODALITY).as_deref(), Some("MR"));
        assert_eq!(get_int_value(&ds, SERIES_NUMBER), Some(10));
        assert_eq!(get_string_value(&ds, STUDY_DESCRIPTION).as_deref(), Some(""));
        assert_eq!(get_non_empty_string(&ds, STUDY_DESCRIPTION), None);
        assert_eq!(get_int_value(&ds, INSTANCE_NUMBER), None);
        assert_eq!(
            get_string_value(&ds, SERIES_DESCRIPTION).as_deref(),
            Some(" T1 axial")
        );
        assert_eq!(get_string_value(&ds, PATIENT_NAME), None);
    }
}
