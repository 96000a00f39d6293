//! Patient → study → series → instance hierarchy
//!
//! Each level is its own struct: display metadata lives in named fields and
//! children live in an insertion-ordered map keyed by their identifier.
//! Iteration order is first-seen order in the input sequence.

mod indexer;
mod simplify;

pub use indexer::Indexer;
pub use simplify::Simplifier;

use crate::dataset::InstanceRecord;
use indexmap::IndexMap;

/// Root of an indexed input side
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    patients: IndexMap<String, PatientNode>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patients(&self) -> impl Iterator<Item = &PatientNode> {
        self.patients.values()
    }

    pub fn patient(&self, patient_id: &str) -> Option<&PatientNode> {
        self.patients.get(patient_id)
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    /// Total number of stored instances
    pub fn instance_count(&self) -> usize {
        self.patients()
            .flat_map(|p| p.studies())
            .flat_map(|s| s.series())
            .map(|s| s.len())
            .sum()
    }
}

/// One patient and its studies
#[derive(Debug, Clone)]
pub struct PatientNode {
    pub patient_id: String,
    /// Simplified, lower-cased patient name
    pub name: String,
    studies: IndexMap<String, StudyNode>,
}

impl PatientNode {
    pub fn studies(&self) -> impl Iterator<Item = &StudyNode> {
        self.studies.values()
    }

    pub fn study(&self, study_instance_uid: &str) -> Option<&StudyNode> {
        self.studies.get(study_instance_uid)
    }

    pub fn len(&self) -> usize {
        self.studies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.studies.is_empty()
    }

    /// `<patient id>-<name>`, as shown in selection menus
    pub fn label(&self) -> String {
        format!("{}-{}", self.patient_id, self.name)
    }
}

/// One study and its series
#[derive(Debug, Clone)]
pub struct StudyNode {
    pub study_instance_uid: String,
    /// Sortable `date.time` stamp, e.g. `20220101.120000`
    pub datetime: String,
    /// Simplified study description
    pub description: String,
    series: IndexMap<String, SeriesNode>,
}

impl StudyNode {
    pub fn series(&self) -> impl Iterator<Item = &SeriesNode> {
        self.series.values()
    }

    pub fn series_by_uid(&self, series_instance_uid: &str) -> Option<&SeriesNode> {
        self.series.get(series_instance_uid)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// `<datetime>-<description>`, as shown in selection menus
    pub fn label(&self) -> String {
        format!("{}-{}", self.datetime, self.description)
    }
}

/// One series and its instances, keyed by SOP Instance UID
///
/// This is the unit exchanged between indexing, matching and the
/// comparison walk.
#[derive(Debug, Clone)]
pub struct SeriesNode {
    pub series_instance_uid: String,
    pub series_number: i32,
    pub modality: String,
    /// Simplified series description
    pub description: String,
    instances: IndexMap<String, InstanceRecord>,
}

impl SeriesNode {
    pub fn instances(&self) -> impl Iterator<Item = &InstanceRecord> {
        self.instances.values()
    }

    pub fn instance(&self, sop_instance_uid: &str) -> Option<&InstanceRecord> {
        self.instances.get(sop_instance_uid)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// `<4-digit number>-<modality>-<description>`, also the report file stem
    ///
    /// ```
    /// use dcmdiff_core::hierarchy::Indexer;
    /// # use dcmdiff_core::dataset::{Dataset, Field, InstanceRecord};
    /// # use dcmdiff_core::dataset::tags::*;
    /// # use dicom_core::VR;
    /// # let record = InstanceRecord::new(Dataset::new(), Dataset::from_iter([
    /// #     Field::new(PATIENT_ID, VR::LO, "ABC123"),
    /// #     Field::new(STUDY_INSTANCE_UID, VR::UI, "1.2.1"),
    /// #     Field::new(SERIES_INSTANCE_UID, VR::UI, "1.2.1.1"),
    /// #     Field::new(SOP_INSTANCE_UID, VR::UI, "1.2.1.1.1"),
    /// #     Field::new(SERIES_NUMBER, VR::IS, "10"),
    /// #     Field::new(MODALITY, VR::CS, "MR"),
    /// #     Field::new(SERIES_DESCRIPTION, VR::LO, "T1"),
    /// # ])).unwrap();
    ///
    /// let hierarchy = Indexer::new().build(vec![record]);
    /// let series = hierarchy.patients().next().unwrap()
    ///     .studies().next().unwrap()
    ///     .series().next().unwrap();
    /// assert_eq!(series.label(), "0010-MR-T1");
    /// ```
    pub fn label(&self) -> String {
        format!(
            "{:04}-{}-{}",
            self.series_number, self.modality, self.description
        )
    }
}
