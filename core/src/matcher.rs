//! Finding the test-side counterpart of a reference series or instance
//!
//! Matching is exact: series pair up on modality plus simplified
//! description, instances on their instance number. Anything the rules
//! cannot settle is handed to a [`Resolver`].

use crate::dataset::InstanceRecord;
use crate::error::Result;
use crate::hierarchy::SeriesNode;
use crate::select::{choose, Menu, Resolver};
use log::debug;

const SERIES_INSTRUCTION: &str = "select one series (n=none):";
const INSTANCE_INSTRUCTION: &str = "select one instance (n=none):";

/// Finds the test series to compare a reference series against
///
/// Exactly one series with the same modality and description is used
/// directly. Several matches are offered for selection. Without any match
/// every test series is offered, and the user may decline.
pub fn find_matching_series<'a>(
    reference: &SeriesNode,
    test_series: &[&'a SeriesNode],
    resolver: &mut dyn Resolver,
) -> Result<Option<&'a SeriesNode>> {
    let matching: Vec<&'a SeriesNode> = test_series
        .iter()
        .copied()
        .filter(|s| s.modality == reference.modality && s.description == reference.description)
        .collect();
    debug!(
        "{} test series match {}",
        matching.len(),
        reference.label()
    );

    let (candidates, heading) = match matching.len() {
        1 => return Ok(Some(matching[0])),
        0 => (
            test_series.to_vec(),
            "*** No series with matching Modality and Series Description found. \
             Would you like to pick one?"
                .to_string(),
        ),
        n => (
            matching,
            format!(
                "*** {} series with matching Modality and Series Description found:",
                n
            ),
        ),
    };

    let menu = Menu::optional(
        candidates.iter().map(|s| s.label()).collect(),
        SERIES_INSTRUCTION,
    )
    .with_heading(heading);

    Ok(choose(&menu, resolver, "series")?.map(|index| candidates[index]))
}

/// Finds the test instance to compare a reference instance against
///
/// Instances pair up on instance number. A test series holding a single
/// instance is paired with any reference instance.
pub fn find_matching_instance<'a>(
    reference: &InstanceRecord,
    test_series: &'a SeriesNode,
    resolver: &mut dyn Resolver,
) -> Result<Option<&'a InstanceRecord>> {
    let number = reference.instance_number();
    let matching: Vec<&'a InstanceRecord> = test_series
        .instances()
        .filter(|r| r.instance_number() == number)
        .collect();

    match matching.len() {
        0 if test_series.len() == 1 => Ok(test_series.instances().next()),
        0 => {
            debug!("No test instance with instance number {}", number);
            Ok(None)
        }
        1 => Ok(Some(matching[0])),
        n => {
            let menu = Menu::optional(
                matching
                    .iter()
                    .map(|r| format!("instance number {:04}", r.instance_number()))
                    .collect(),
                INSTANCE_INSTRUCTION,
            )
            .with_heading(format!(
                "\n*** {} Instances with matching Instance Number found:",
                n
            ));
            Ok(choose(&menu, resolver, "instances")?.map(|index| matching[index]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tags::*;
    use crate::dataset::{Dataset, Field};
    use crate::hierarchy::{Hierarchy, Indexer};
    use crate::select::ScriptedResolver;
    use dicom_core::VR;

    fn record(series: (&str, &str, &str, &str), sop_uid: &str, number: &str) -> InstanceRecord {
        let ds = Dataset::from_iter([
            Field::new(PATIENT_ID, VR::LO, "ABC123"),
            Field::new(STUDY_INSTANCE_UID, VR::UI, "1.1"),
            Field::new(SERIES_INSTANCE_UID, VR::UI, series.0),
            Field::new(SERIES_NUMBER, VR::IS, series.1),
            Field::new(MODALITY, VR::CS, series.2),
            Field::new(SERIES_DESCRIPTION, VR::LO, series.3),
            Field::new(SOP_INSTANCE_UID, VR::UI, sop_uid),
            Field::new(INSTANCE_NUMBER, VR::IS, number),
        ]);
        InstanceRecord::new(Dataset::new(), ds).unwrap()
    }

    fn all_series(hierarchy: &Hierarchy) -> Vec<&SeriesNode> {
        hierarchy
            .patients()
            .flat_map(|p| p.studies())
            .flat_map(|s| s.series())
            .collect()
    }

    fn reference() -> Hierarchy {
        Indexer::new().build(vec![record(("9", "10", "MR", "T1"), "9.1", "1")])
    }

    #[test]
    fn test_single_series_match_without_prompt() {
        let reference = reference();
        let test = Indexer::new().build(vec![
            record(("1", "1", "MR", "T2"), "1.1", "1"),
            record(("2", "2", "MR", "T1"), "2.1", "1"),
            record(("3", "3", "CT", "T1"), "3.1", "1"),
        ]);
        let mut resolver = ScriptedResolver::default();

        let found = find_matching_series(
            all_series(&reference)[0],
            &all_series(&test),
            &mut resolver,
        )
        .unwrap();
        assert_eq!(found.unwrap().series_instance_uid, "2");
        assert!(resolver.asked().is_empty());
    }

    #[test]
    fn test_multiple_series_matches_offer_subset() {
        let reference = reference();
        let test = Indexer::new().build(vec![
            record(("1", "1", "MR", "T1"), "1.1", "1"),
            record(("2", "2", "CT", "T1"), "2.1", "1"),
            record(("3", "3", "MR", "T1"), "3.1", "1"),
        ]);
        let mut resolver = ScriptedResolver::new(["1"]);

        let found = find_matching_series(
            all_series(&reference)[0],
            &all_series(&test),
            &mut resolver,
        )
        .unwrap();
        assert_eq!(found.unwrap().series_instance_uid, "3");

        let menu = &resolver.asked()[0];
        assert_eq!(menu.entries, vec!["0001-MR-T1", "0003-MR-T1"]);
        assert_eq!(
            menu.heading.as_deref(),
            Some("*** 2 series with matching Modality and Series Description found:")
        );
    }

    #[test]
    fn test_no_series_match_offers_all_and_accepts_none() {
        let reference = reference();
        let test = Indexer::new().build(vec![record(("1", "1", "CT", "Bone"), "1.1", "1")]);
        let mut resolver = ScriptedResolver::new(["n"]);

        let found = find_matching_series(
            all_series(&reference)[0],
            &all_series(&test),
            &mut resolver,
        )
        .unwrap();
        assert!(found.is_none());

        let menu = &resolver.asked()[0];
        assert_eq!(menu.entries, vec!["0001-CT-Bone"]);
        assert!(menu.allow_none);
        assert!(menu.heading.as_deref().unwrap().contains("Would you like to pick one?"));
    }

    #[test]
    fn test_no_series_match_can_pick_any() {
        let reference = reference();
        let test = Indexer::new().build(vec![
            record(("1", "1", "CT", "Bone"), "1.1", "1"),
            record(("2", "2", "MR", "T2"), "2.1", "1"),
        ]);
        let mut resolver = ScriptedResolver::new(["1"]);

        let found = find_matching_series(
            all_series(&reference)[0],
            &all_series(&test),
            &mut resolver,
        )
        .unwrap();
        assert_eq!(found.unwrap().series_instance_uid, "2");
    }

    #[test]
    fn test_instance_match_by_number() {
        let test = Indexer::new().build(vec![
            record(("1", "1", "MR", "T1"), "1.1", "1"),
            record(("1", "1", "MR", "T1"), "1.2", "2"),
            record(("1", "1", "MR", "T1"), "1.3", "3"),
        ]);
        let reference = record(("9", "10", "MR", "T1"), "9.2", "2");
        let mut resolver = ScriptedResolver::default();

        let found =
            find_matching_instance(&reference, all_series(&test)[0], &mut resolver).unwrap();
        assert_eq!(found.unwrap().sop_instance_uid(), "1.2");
    }

    #[test]
    fn test_single_instance_fallback() {
        let test = Indexer::new().build(vec![record(("1", "1", "MR", "T1"), "1.1", "7")]);
        let reference = record(("9", "10", "MR", "T1"), "9.1", "1");
        let mut resolver = ScriptedResolver::default();

        let found =
            find_matching_instance(&reference, all_series(&test)[0], &mut resolver).unwrap();
        assert_eq!(found.unwrap().sop_instance_uid(), "1.1");
        assert!(resolver.asked().is_empty());
    }

    #[test]
    fn test_no_instance_match() {
        let test = Indexer::new().build(vec![
            record(("1", "1", "MR", "T1"), "1.1", "2"),
            record(("1", "1", "MR", "T1"), "1.2", "3"),
        ]);
        let reference = record(("9", "10", "MR", "T1"), "9.1", "1");
        let mut resolver = ScriptedResolver::default();

        let found =
            find_matching_instance(&reference, all_series(&test)[0], &mut resolver).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_multiple_instance_matches_prompt() {
        let test = Indexer::new().build(vec![
            record(("1", "1", "MR", "T1"), "1.1", "4"),
            record(("1", "1", "MR", "T1"), "1.2", "4"),
            record(("1", "1", "MR", "T1"), "1.3", "5"),
        ]);
        let reference = record(("9", "10", "MR", "T1"), "9.1", "4");
        let mut resolver = ScriptedResolver::new(["1"]);

        let found =
            find_matching_instance(&reference, all_series(&test)[0], &mut resolver).unwrap();
        assert_eq!(found.unwrap().sop_instance_uid(), "1.2");
        assert_eq!(
            resolver.asked()[0].entries,
            vec!["instance number 0004", "instance number 0004"]
        );
    }
}
