use super::{Hierarchy, PatientNode, SeriesNode, Simplifier, StudyNode};
use crate::dataset::tags::{
    get_int_value, get_string_value, MODALITY, PATIENT_NAME, SERIES_DESCRIPTION, SERIES_NUMBER,
    STUDY_DATE, STUDY_DESCRIPTION, STUDY_TIME,
};
use crate::dataset::{Dataset, InstanceRecord};
use crate::progress::progress;
use indexmap::map::Entry;
use indexmap::IndexMap;
use log::debug;

const DEFAULT_STUDY_DATE: &str = "20000101";
const DEFAULT_STUDY_TIME: &str = "120000";
const UNKNOWN: &str = "unknown";

/// Groups flat records into a [`Hierarchy`]
///
/// Display metadata for a patient, study or series is taken from the first
/// record that mentions it. Defaults only stand in for absent fields; a
/// present but empty value stays empty. A record whose SOP Instance UID is
/// already present in its series is dropped.
#[derive(Debug, Clone, Default)]
pub struct Indexer {
    simplifier: Simplifier,
}

impl Indexer {
    pub fn new() -> Self {
        Self {
            simplifier: Simplifier::new(),
        }
    }

    pub fn simplifier(&self) -> &Simplifier {
        &self.simplifier
    }

    /// Indexes records in input order, printing sorting progress
    pub fn build(&self, records: Vec<InstanceRecord>) -> Hierarchy {
        let total = records.len();
        let message = format!("** sorting {} datasets", total);
        let mut hierarchy = Hierarchy::new();

        for (counter, record) in records.into_iter().enumerate() {
            progress(counter + 1, total, &message);
            self.insert(&mut hierarchy, record);
        }

        hierarchy
    }

    /// Adds one record, returning `false` if its instance was already present
    pub fn insert(&self, hierarchy: &mut Hierarchy, record: InstanceRecord) -> bool {
        let key = record.key.clone();
        let ds = &record.dataset;

        let patient = hierarchy
            .patients
            .entry(key.patient_id.clone())
            .or_insert_with(|| self.patient_node(&key.patient_id, ds));

        let study = patient
            .studies
            .entry(key.study_instance_uid.clone())
            .or_insert_with(|| self.study_node(&key.study_instance_uid, ds));

        let series = study
            .series
            .entry(key.series_instance_uid.clone())
            .or_insert_with(|| self.series_node(&key.series_instance_uid, ds));

        match series.instances.entry(key.sop_instance_uid) {
            Entry::Occupied(entry) => {
                debug!("Duplicate instance ignored: {}", entry.key());
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(record);
                true
            }
        }
    }

    fn patient_node(&self, patient_id: &str, ds: &Dataset) -> PatientNode {
        let name = get_string_value(ds, PATIENT_NAME).unwrap_or_else(|| UNKNOWN.to_string());
        PatientNode {
            patient_id: patient_id.to_string(),
            name: self.simplifier.name(&name.to_lowercase()),
            studies: IndexMap::new(),
        }
    }

    fn study_node(&self, study_instance_uid: &str, ds: &Dataset) -> StudyNode {
        let date =
            get_string_value(ds, STUDY_DATE).unwrap_or_else(|| DEFAULT_STUDY_DATE.to_string());
        let time = get_string_value(ds, STUDY_TIME)
            .map(|t| t.split('.').next().unwrap_or_default().to_string())
            .unwrap_or_else(|| DEFAULT_STUDY_TIME.to_string());
        let description =
            get_string_value(ds, STUDY_DESCRIPTION).unwrap_or_else(|| UNKNOWN.to_string());

        StudyNode {
            study_instance_uid: study_instance_uid.to_string(),
            datetime: format!("{}.{}", date, time),
            description: self.simplifier.description(&description),
            series: IndexMap::new(),
        }
    }

    fn series_node(&self, series_instance_uid: &str, ds: &Dataset) -> SeriesNode {
        let description =
            get_string_value(ds, SERIES_DESCRIPTION).unwrap_or_else(|| UNKNOWN.to_string());

        SeriesNode {
            series_instance_uid: series_instance_uid.to_string(),
            series_number: get_int_value(ds, SERIES_NUMBER).unwrap_or(1),
            modality: get_string_value(ds, MODALITY).unwrap_or_else(|| UNKNOWN.to_string()),
            description: self.simplifier.description(&description),
            instances: IndexMap::new(),
        }
    }
}
