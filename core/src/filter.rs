use crate::dataset::{Dataset, Field, InstanceRecord};
use dicom_core::{Tag, VR};
use std::collections::HashSet;

/// One step of the tag filter pipeline
///
/// Stages run in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStage {
    /// Drop fields in odd (private) groups
    Private,
    /// Drop fields with an ignored value representation
    Vr,
    /// Drop fields in an ignored group
    Group,
    /// Drop explicitly ignored tags
    Tag,
    /// Drop every tag outside the allow-list
    KeepOnly,
}

/// Which fields take part in a comparison
///
/// Every filter deletes fields, at every nesting level, and never alters
/// the values of the fields it keeps. The same filter is applied to both
/// sides of a pair and to both the file meta group and the main data set.
///
/// # Example
///
/// ```
/// use dcmdiff_core::FilterSpec;
/// use dicom_core::{Tag, VR};
///
/// let filter = FilterSpec::default()
///     .ignore_private(true)
///     .ignore_vrs([VR::UI])
///     .ignore_groups([0x0002]);
///
/// assert!(filter.ignore_private);
/// assert!(filter.ignore_vrs.contains(&VR::UI));
/// assert!(filter.keep_tags.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSpec {
    /// Allow-list; if Some, every other tag is dropped
    pub keep_tags: Option<HashSet<Tag>>,

    /// Tags to drop
    pub ignore_tags: HashSet<Tag>,

    /// Value representations to drop
    pub ignore_vrs: HashSet<VR>,

    /// Groups to drop
    pub ignore_groups: HashSet<u16>,

    /// Drop private (odd group) fields
    pub ignore_private: bool,
}

impl FilterSpec {
    /// Builder: keep only these tags
    ///
    /// # Example
    ///
    /// ```
    /// use dcmdiff_core::FilterSpec;
    /// use dicom_core::Tag;
    ///
    /// let filter = FilterSpec::default().with_keep_tags([Tag(0x0018, 0x0080)]);
    /// assert_eq!(filter.keep_tags.unwrap().len(), 1);
    /// ```
    pub fn with_keep_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.keep_tags = Some(tags.into_iter().collect());
        self
    }

    /// Builder: drop these tags
    pub fn ignore_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.ignore_tags.extend(tags);
        self
    }

    /// Builder: drop fields with these value representations
    pub fn ignore_vrs(mut self, vrs: impl IntoIterator<Item = VR>) -> Self {
        self.ignore_vrs.extend(vrs);
        self
    }

    /// Builder: drop these groups
    pub fn ignore_groups(mut self, groups: impl IntoIterator<Item = u16>) -> Self {
        self.ignore_groups.extend(groups);
        self
    }

    /// Builder: drop private fields
    pub fn ignore_private(mut self, ignore: bool) -> Self {
        self.ignore_private = ignore;
        self
    }

    /// Stages with something to do, in execution order
    pub fn active_stages(&self) -> Vec<FilterStage> {
        let mut stages = Vec::new();
        if self.ignore_private {
            stages.push(FilterStage::Private);
        }
        if !self.ignore_vrs.is_empty() {
            stages.push(FilterStage::Vr);
        }
        if !self.ignore_groups.is_empty() {
            stages.push(FilterStage::Group);
        }
        if !self.ignore_tags.is_empty() {
            stages.push(FilterStage::Tag);
        }
        if self.keep_tags.is_some() {
            stages.push(FilterStage::KeepOnly);
        }
        stages
    }

    fn keeps(&self, stage: FilterStage, field: &Field) -> bool {
        match stage {
            FilterStage::Private => !field.is_private(),
            FilterStage::Vr => !self.ignore_vrs.contains(&field.vr),
            FilterStage::Group => !self.ignore_groups.contains(&field.tag.group()),
            FilterStage::Tag => !self.ignore_tags.contains(&field.tag),
            FilterStage::KeepOnly => self
                .keep_tags
                .as_ref()
                .map_or(true, |keep| keep.contains(&field.tag)),
        }
    }

    /// Runs every active stage over a data set
    pub fn apply_dataset(&self, ds: &Dataset) -> Dataset {
        self.active_stages()
            .into_iter()
            .fold(ds.clone(), |current, stage| {
                current.retain(&|field: &Field| self.keeps(stage, field))
            })
    }

    /// Filters both the file meta group and the main data set of a record
    pub fn apply(&self, record: &InstanceRecord) -> InstanceRecord {
        InstanceRecord {
            file_path: record.file_path.clone(),
            key: record.key.clone(),
            meta: self.apply_dataset(&record.meta),
            dataset: self.apply_dataset(&record.dataset),
        }
    }
}
