//! Comparison run
//!
//! A run loads and indexes both input sides, settles on one patient and one
//! study per side, then walks the reference series in order. Each reference
//! series is matched against the test study once; each of its instances is
//! matched inside that test series, filtered and diffed. Unmatched series
//! and instances produce placeholder pages and the walk continues.

use crate::dataset::InstanceRecord;
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::hierarchy::{Hierarchy, Indexer, SeriesNode};
use crate::loader::load_records;
use crate::matcher::{find_matching_instance, find_matching_series};
use crate::progress::progress;
use crate::report::{
    index_page, instance_file_name, instance_placeholder, render_html_diff, series_file_name,
    series_page, write_page, DiffMode, Link, STUDY_INDEX_FILE,
};
use crate::select::{select_patient, select_study, Resolver};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Default report directory
pub const DEFAULT_OUTPUT_DIR: &str = "./htmldiff";

/// Settings of a comparison run
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOptions {
    /// Report directory, created if missing
    pub output_dir: PathBuf,

    /// Full or context diff pages
    pub mode: DiffMode,

    /// Fields taking part in each instance comparison
    pub filter: FilterSpec,

    /// Compare only the first instance of every reference series
    pub first_instance_only: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            mode: DiffMode::Full,
            filter: FilterSpec::default(),
            first_instance_only: false,
        }
    }
}

/// Counts of what a run wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonSummary {
    /// Path of the study index page
    pub index_path: PathBuf,
    /// Reference series written
    pub series: usize,
    /// Reference series without a test counterpart
    pub unmatched_series: usize,
    /// Instance diff pages written
    pub instances: usize,
    /// Instance placeholder pages written
    pub unmatched_instances: usize,
}

/// Drives one comparison run
///
/// Every choice the matching rules cannot settle is put to the resolver.
pub struct Comparison<R> {
    options: DiffOptions,
    indexer: Indexer,
    resolver: R,
}

impl<R: Resolver> Comparison<R> {
    pub fn new(options: DiffOptions, resolver: R) -> Self {
        Self {
            options,
            indexer: Indexer::new(),
            resolver,
        }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Loads both input paths and compares them
    pub fn run(&mut self, reference: &Path, test: &Path) -> Result<ComparisonSummary> {
        println!("* processing reference DICOM(s)");
        let reference = self.indexer.build(load_records(reference)?);

        println!("* processing test DICOM(s)");
        let test = self.indexer.build(load_records(test)?);

        self.compare_hierarchies(&reference, &test)
    }

    /// Compares two indexed input sides and writes the report pages
    pub fn compare_hierarchies(
        &mut self,
        reference: &Hierarchy,
        test: &Hierarchy,
    ) -> Result<ComparisonSummary> {
        let ref_patient = select_patient(reference, &mut self.resolver)?;
        let ref_study = select_study(ref_patient, &mut self.resolver)?;
        let test_patient = select_patient(test, &mut self.resolver)?;
        let test_study = select_study(test_patient, &mut self.resolver)?;
        info!(
            "Comparing study {} of {} with study {} of {}",
            ref_study.label(),
            ref_patient.label(),
            test_study.label(),
            test_patient.label()
        );

        std::fs::create_dir_all(&self.options.output_dir)?;
        let out_dir = std::fs::canonicalize(&self.options.output_dir)?;

        let test_series: Vec<&SeriesNode> = test_study.series().collect();
        let mut summary = ComparisonSummary {
            index_path: out_dir.join(STUDY_INDEX_FILE),
            ..Default::default()
        };
        let mut series_links = Vec::with_capacity(ref_study.len());

        println!("* comparing DICOM instance(s) in series:");
        for ref_series in ref_study.series() {
            let label = ref_series.label();
            println!("** {}:", label);
            let series_path = out_dir.join(series_file_name(&label));

            let page = match find_matching_series(ref_series, &test_series, &mut self.resolver)? {
                Some(matched) => {
                    debug!("{} matched with {}", label, matched.label());
                    let links = self.compare_series(ref_series, matched, &out_dir, &mut summary)?;
                    series_page(&label, Some(&matched.label()), &links)
                }
                None => {
                    summary.unmatched_series += 1;
                    series_page(&label, None, &[])
                }
            };
            write_page(&series_path, &page)?;

            summary.series += 1;
            series_links.push(Link::new(series_path, label));
        }

        write_page(&summary.index_path, &index_page(&series_links))?;
        info!("Study index written to {}", summary.index_path.display());

        Ok(summary)
    }

    fn compare_series(
        &mut self,
        reference: &SeriesNode,
        test: &SeriesNode,
        out_dir: &Path,
        summary: &mut ComparisonSummary,
    ) -> Result<Vec<Link>> {
        let total = reference.len();
        let limit = self.instance_limit(total);
        let message = format!("*** comparing {} instances", total);
        let mut links = Vec::with_capacity(limit);

        for (counter, ref_record) in reference.instances().take(limit).enumerate() {
            let uid = ref_record.sop_instance_uid();
            let path = out_dir.join(instance_file_name(uid));

            let page = match find_matching_instance(ref_record, test, &mut self.resolver)? {
                Some(test_record) => {
                    summary.instances += 1;
                    self.diff_page(ref_record, test_record)
                }
                None => {
                    summary.unmatched_instances += 1;
                    instance_placeholder(uid)
                }
            };
            write_page(&path, &page)?;
            progress(counter + 1, total, &message);

            links.push(Link::new(path, uid));
        }
        if limit < total {
            // progress stopped short of 100% and did not end the line
            println!();
        }

        Ok(links)
    }

    /// How many instances of a series with `total` instances get compared
    fn instance_limit(&self, total: usize) -> usize {
        if self.options.first_instance_only {
            total.min(1)
        } else {
            total
        }
    }

    fn diff_page(&self, reference: &InstanceRecord, test: &InstanceRecord) -> String {
        let filter = &self.options.filter;
        let reference = filter.apply(reference);
        let test = filter.apply(test);
        render_html_diff(&reference.to_lines(), &test.to_lines(), self.options.mode)
    }
}
