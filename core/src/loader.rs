//! Loading of DICOM files into [`InstanceRecord`]s
//!
//! A path is either a single file or a directory that is walked
//! recursively. Only files with the `DICM` magic are decoded, pixel data
//! is never read, and DICOMDIR files are skipped.

use crate::dataset::tags::{
    FILE_META_INFORMATION_GROUP_LENGTH, FILE_META_INFORMATION_VERSION, IMPLEMENTATION_CLASS_UID,
    IMPLEMENTATION_VERSION_NAME, MEDIA_STORAGE_SOP_CLASS_UID, MEDIA_STORAGE_SOP_INSTANCE_UID,
    PIXEL_DATA, PRIVATE_INFORMATION, PRIVATE_INFORMATION_CREATOR_UID,
    RECEIVING_APPLICATION_ENTITY_TITLE, SENDING_APPLICATION_ENTITY_TITLE,
    SOURCE_APPLICATION_ENTITY_TITLE, TRANSFER_SYNTAX_UID,
};
use crate::dataset::{is_directory_index, Dataset, Field, InstanceRecord};
use crate::error::{DcmdiffError, Result};
use crate::progress::progress;
use dicom_core::VR;
use dicom_object::{FileMetaTable, OpenFileOptions};
use log::{debug, info, warn};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Loads every usable record below `path`
///
/// Files that are not DICOM, DICOMDIRs and files missing a hierarchy
/// identifier are skipped.
///
/// # Errors
///
/// - [`DcmdiffError::InvalidPath`] if `path` is neither a file nor a directory
/// - [`DcmdiffError::NoDicomFiles`] if nothing usable was found
pub fn load_records(path: &Path) -> Result<Vec<InstanceRecord>> {
    let candidates = if path.is_file() {
        vec![path.to_path_buf()]
    } else if path.is_dir() {
        let files = collect_files(path)?;
        info!("Found {} files below {}", files.len(), path.display());
        files
    } else {
        return Err(DcmdiffError::InvalidPath(path.to_path_buf()));
    };

    let total = candidates.len();
    let show_progress = path.is_dir();
    let mut records = Vec::new();
    for (counter, file_path) in candidates.into_iter().enumerate() {
        if show_progress {
            progress(counter + 1, total, &format!("** loading {} files", total));
        }

        if !is_dicom_file(&file_path) {
            debug!("Not a DICOM file: {}", file_path.display());
            continue;
        }

        match read_record(&file_path) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => debug!("Skipping DICOMDIR: {}", file_path.display()),
            Err(e) => warn!("Skipping {}: {}", file_path.display(), e),
        }
    }

    if records.is_empty() {
        return Err(DcmdiffError::NoDicomFiles(path.to_path_buf()));
    }

    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Decodes one file, stopping before pixel data
///
/// Returns `Ok(None)` for a DICOMDIR.
pub fn read_record(path: &Path) -> Result<Option<InstanceRecord>> {
    let obj = OpenFileOptions::new()
        .read_until(PIXEL_DATA)
        .open_file(path)?;

    let meta = meta_dataset(obj.meta());
    if is_directory_index(&meta) {
        return Ok(None);
    }

    let dataset = Dataset::from_dicom(&obj);
    let record = InstanceRecord::new(meta, dataset).map_err(|keyword| {
        DcmdiffError::MissingIdentifier {
            path: path.to_path_buf(),
            keyword,
        }
    })?;

    Ok(Some(record.with_file_path(path.to_path_buf())))
}

/// Converts the file meta table into a data set so it can be filtered and
/// printed like any other
pub fn meta_dataset(meta: &FileMetaTable) -> Dataset {
    let text = |value: &str| value.trim_end_matches(['\0', ' ']).to_string();

    let mut ds = Dataset::from_iter([
        Field::new(
            FILE_META_INFORMATION_GROUP_LENGTH,
            VR::UL,
            meta.information_group_length,
        ),
        Field::new(
            FILE_META_INFORMATION_VERSION,
            VR::OB,
            meta.information_version.to_vec(),
        ),
        Field::new(
            MEDIA_STORAGE_SOP_CLASS_UID,
            VR::UI,
            text(&meta.media_storage_sop_class_uid),
        ),
        Field::new(
            MEDIA_STORAGE_SOP_INSTANCE_UID,
            VR::UI,
            text(&meta.media_storage_sop_instance_uid),
        ),
        Field::new(TRANSFER_SYNTAX_UID, VR::UI, text(&meta.transfer_syntax)),
        Field::new(
            IMPLEMENTATION_CLASS_UID,
            VR::UI,
            text(&meta.implementation_class_uid),
        ),
    ]);

    let optional = [
        (IMPLEMENTATION_VERSION_NAME, VR::SH, &meta.implementation_version_name),
        (SOURCE_APPLICATION_ENTITY_TITLE, VR::AE, &meta.source_application_entity_title),
        (SENDING_APPLICATION_ENTITY_TITLE, VR::AE, &meta.sending_application_entity_title),
        (
            RECEIVING_APPLICATION_ENTITY_TITLE,
            VR::AE,
            &meta.receiving_application_entity_title,
        ),
        (PRIVATE_INFORMATION_CREATOR_UID, VR::UI, &meta.private_information_creator_uid),
    ];
    for (tag, vr, value) in optional {
        if let Some(value) = value {
            ds.put(Field::new(tag, vr, text(value)));
        }
    }

    if let Some(info) = &meta.private_information {
        ds.put(Field::new(PRIVATE_INFORMATION, VR::OB, info.clone()));
    }

    ds
}

/// Lists every regular file below a directory, sorted by path
fn collect_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(directory) {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Checks if a file has a DICOM header
///
/// DICOM files have a 128-byte preamble followed by the 4-byte "DICM"
/// magic string at offset 128.
pub fn is_dicom_file(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    // Read first 132 bytes (128-byte preamble + 4-byte "DICM" magic)
    let mut buffer = [0u8; 132];
    match file.read_exact(&mut buffer) {
        Ok(()) => &buffer[128..132] == b"DICM",
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tags::{
        MODALITY, PATIENT_ID, SERIES_INSTANCE_UID, SOP_INSTANCE_UID, STUDY_INSTANCE_UID,
    };
    use dicom_core::{DataElement, PrimitiveValue};
    use dicom_object::{FileMetaTableBuilder, InMemDicomObject};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_instance(path: &Path, patient_id: Option<&str>, sop_uid: &str) {
        let mut obj = InMemDicomObject::new_empty();
        if let Some(patient_id) = patient_id {
            obj.put(DataElement::new(PATIENT_ID, VR::LO, PrimitiveValue::from(patient_id)));
        }
        obj.put(DataElement::new(STUDY_INSTANCE_UID, VR::UI, PrimitiveValue::from("1.2.3")));
        obj.put(DataElement::new(SERIES_INSTANCE_UID, VR::UI, PrimitiveValue::from("1.2.3.4")));
        obj.put(DataElement::new(SOP_INSTANCE_UID, VR::UI, PrimitiveValue::from(sop_uid)));
        obj.put(DataElement::new(MODALITY, VR::CS, PrimitiveValue::from("MR")));

        let file_obj = obj
            .with_meta(
                FileMetaTableBuilder::new()
                    .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.4")
                    .media_storage_sop_instance_uid(sop_uid)
                    .transfer_syntax("1.2.840.10008.1.2.1"),
            )
            .unwrap();
        file_obj.write_to_file(path).unwrap();
    }

    #[test]
    fn test_is_dicom_file_with_valid_header() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test_dicom");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(&[0u8; 128]).unwrap();
        file.write_all(b"DICM").unwrap();
        file.write_all(b"additional data").unwrap();

        assert!(is_dicom_file(&file_path));
    }

    #[test]
    fn test_is_dicom_file_too_small_or_wrong_magic() {
        let temp_dir = TempDir::new().unwrap();

        let small = temp_dir.path().join("small_file");
        File::create(&small).unwrap().write_all(b"small").unwrap();
        assert!(!is_dicom_file(&small));

        let wrong = temp_dir.path().join("wrong_magic");
        let mut file = File::create(&wrong).unwrap();
        file.write_all(&[0u8; 128]).unwrap();
        file.write_all(b"NOTM").unwrap();
        assert!(!is_dicom_file(&wrong));

        assert!(!is_dicom_file(&temp_dir.path().join("missing")));
    }

    #[test]
    fn test_load_records_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ref.dcm");
        write_instance(&path, Some("ABC123"), "1.2.3.4.1");

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sop_instance_uid(), "1.2.3.4.1");
        assert_eq!(records[0].file_path.as_deref(), Some(path.as_path()));
        assert!(records[0].meta.contains(TRANSFER_SYNTAX_UID));
    }

    #[test]
    fn test_load_records_directory_skips_unusable_files() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();

        write_instance(&temp_dir.path().join("b.dcm"), Some("ABC123"), "1.2.3.4.2");
        write_instance(&nested.join("a.dcm"), Some("ABC123"), "1.2.3.4.1");
        write_instance(&temp_dir.path().join("no_patient.dcm"), None, "1.2.3.4.3");
        File::create(temp_dir.path().join("notes.txt"))
            .unwrap()
            .write_all(b"not dicom")
            .unwrap();

        let records = load_records(temp_dir.path()).unwrap();
        let uids: Vec<_> = records.iter().map(|r| r.sop_instance_uid()).collect();
        assert_eq!(uids, vec!["1.2.3.4.2", "1.2.3.4.1"]);
    }

    #[test]
    fn test_load_records_errors() {
        let temp_dir = TempDir::new().unwrap();

        let missing = temp_dir.path().join("file_not_exist");
        assert!(matches!(
            load_records(&missing),
            Err(DcmdiffError::InvalidPath(_))
        ));

        let not_dicom = temp_dir.path().join("not_dicom");
        File::create(&not_dicom).unwrap();
        assert!(matches!(
            load_records(&not_dicom),
            Err(DcmdiffError::NoDicomFiles(_))
        ));
    }
}
