pub mod report;

use crate::compare::{DiffOptions, DEFAULT_OUTPUT_DIR};
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::report::DiffMode;
use crate::tagspec::{parse_group, parse_tag, parse_vr, read_tag_file};
use clap::Parser;
use dicom_core::{Tag, VR};
use std::path::PathBuf;

/// Command-line arguments for dcmdiff
#[derive(Parser, Debug)]
#[command(name = "dcmdiff")]
#[command(about = "Compare reference and test DICOM studies and write HTML difference reports")]
#[command(version)]
pub struct Cli {
    /// Reference DICOM file or directory
    #[arg(value_name = "REFERENCE")]
    pub reference: PathBuf,

    /// Test DICOM file or directory
    #[arg(value_name = "TEST")]
    pub test: PathBuf,

    /// Output directory for the HTML reports
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// File listing the tags to compare, one keyword (RepetitionTime) or
    /// group/element number (0x00180080) per line
    #[arg(short = 'c', long, value_name = "FILE")]
    pub compare_tags: Option<PathBuf>,

    /// Produce context diffs instead of showing full files
    #[arg(long)]
    pub context: bool,

    /// Number of context lines
    #[arg(short, long, value_name = "NUM", default_value_t = 1)]
    pub lines: usize,

    /// Only compare one instance per series
    #[arg(long)]
    pub compare_one_inst: bool,

    /// Ignore all elements with an odd group number
    #[arg(long)]
    pub ignore_private: bool,

    /// Value representations to ignore (e.g. CS DA UI)
    #[arg(long, value_name = "VR", num_args = 1.., value_parser = vr_arg)]
    pub ignore_vr: Vec<VR>,

    /// Groups to ignore (e.g. 0x0008 0x0010)
    #[arg(long, value_name = "GROUP", num_args = 1.., value_parser = group_arg)]
    pub ignore_group: Vec<u16>,

    /// Tags to ignore, as keywords or group/element numbers
    #[arg(long, value_name = "TAG", num_args = 1.., value_parser = tag_arg)]
    pub ignore_tag: Vec<Tag>,

    /// Open the study index in the default web browser when done
    #[arg(long)]
    pub open: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

fn vr_arg(text: &str) -> std::result::Result<VR, String> {
    parse_vr(text).map_err(|e| e.to_string())
}

fn group_arg(text: &str) -> std::result::Result<u16, String> {
    parse_group(text).map_err(|e| e.to_string())
}

fn tag_arg(text: &str) -> std::result::Result<Tag, String> {
    parse_tag(text).map_err(|e| e.to_string())
}

impl Cli {
    pub fn diff_mode(&self) -> DiffMode {
        if self.context {
            DiffMode::Context { lines: self.lines }
        } else {
            DiffMode::Full
        }
    }

    /// Filter settings, reading the tag-list file if one was given
    pub fn filter_spec(&self) -> Result<FilterSpec> {
        let mut filter = FilterSpec::default()
            .ignore_private(self.ignore_private)
            .ignore_vrs(self.ignore_vr.iter().copied())
            .ignore_groups(self.ignore_group.iter().copied())
            .ignore_tags(self.ignore_tag.iter().copied());

        if let Some(path) = &self.compare_tags {
            println!("* loading {}", path.display());
            filter = filter.with_keep_tags(read_tag_file(path)?);
        }

        Ok(filter)
    }

    pub fn diff_options(&self) -> Result<DiffOptions> {
        Ok(DiffOptions {
            output_dir: self.output.clone(),
            mode: self.diff_mode(),
            filter: self.filter_spec()?,
            first_instance_only: self.compare_one_inst,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DcmdiffError;
    use std::ffi::OsString;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dcmdiff", "ref", "test"]).unwrap();
        let options = cli.diff_options().unwrap();

        assert_eq!(cli.reference, PathBuf::from("ref"));
        assert_eq!(cli.test, PathBuf::from("test"));
        assert!(!cli.open);
        assert_eq!(options, DiffOptions::default());
    }

    #[test]
    fn test_all_options() {
        let cli = Cli::try_parse_from([
            "dcmdiff",
            "ref",
            "test",
            "-o",
            "out",
            "--context",
            "-l",
            "3",
            "--compare-one-inst",
            "--ignore-private",
            "--ignore-vr",
            "UI",
            "ob",
            "--ignore-group",
            "0x0002",
            "0029",
            "--ignore-tag",
            "RepetitionTime",
            "0x00100010",
            "--open",
            "-v",
        ])
        .unwrap();
        let options = cli.diff_options().unwrap();

        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.mode, DiffMode::Context { lines: 3 });
        assert!(options.first_instance_only);
        assert!(cli.open);
        assert!(cli.verbose);

        let expected = FilterSpec::default()
            .ignore_private(true)
            .ignore_vrs([VR::UI, VR::OB])
            .ignore_groups([0x0002, 0x0029])
            .ignore_tags([Tag(0x0018, 0x0080), Tag(0x0010, 0x0010)]);
        assert_eq!(options.filter, expected);
    }

    #[test]
    fn test_invalid_values_rejected_at_parse_time() {
        assert!(Cli::try_parse_from(["dcmdiff", "ref", "test", "--ignore-vr", "XX"]).is_err());
        assert!(Cli::try_parse_from(["dcmdiff", "ref", "test", "--ignore-group", "g"]).is_err());
        assert!(
            Cli::try_parse_from(["dcmdiff", "ref", "test", "--ignore-tag", "EchTime"]).is_err()
        );
        assert!(Cli::try_parse_from(["dcmdiff", "ref"]).is_err());
    }

    #[test]
    fn test_compare_tags_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tags.txt");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"RepetitionTime\nEchoTime\n")
            .unwrap();

        let args: Vec<OsString> = vec![
            "dcmdiff".into(),
            "ref".into(),
            "test".into(),
            "-c".into(),
            path.into_os_string(),
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let filter = cli.filter_spec().unwrap();
        let keep = filter.keep_tags.unwrap();
        assert!(keep.contains(&Tag(0x0018, 0x0080)));
        assert!(keep.contains(&Tag(0x0018, 0x0081)));

        let missing = Cli::try_parse_from(["dcmdiff", "ref", "test", "-c", "missing.txt"]).unwrap();
        assert!(matches!(
            missing.filter_spec(),
            Err(DcmdiffError::TagFileMissing(_))
        ));
    }
}
