use crate::error::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File name of the study index page
pub const STUDY_INDEX_FILE: &str = "study_index.html";

const PAGE_START: &str = "<!DOCTYPE html>\n<html>\n<body>\n";
const PAGE_END: &str = "</body>\n</html>";
const LIST_START: &str = "<ol type= \"1\">\n";
const LIST_END: &str = "</ol>\n";

/// An entry of an ordered link list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub target: PathBuf,
    pub label: String,
}

impl Link {
    pub fn new(target: PathBuf, label: impl Into<String>) -> Self {
        Self {
            target,
            label: label.into(),
        }
    }

    fn to_item(&self) -> String {
        format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            self.target.display(),
            self.label
        )
    }
}

/// Report file name for a series label
pub fn series_file_name(label: &str) -> String {
    format!("{}.html", label)
}

/// Report file name for a SOP Instance UID
pub fn instance_file_name(sop_instance_uid: &str) -> String {
    format!("{}.html", sop_instance_uid)
}

/// Study index listing one page per reference series
///
/// ```
/// use dcmdiff_core::report::{index_page, Link};
///
/// let page = index_page(&[Link::new("/out/0010-MR-T1.html".into(), "0010-MR-T1")]);
/// assert!(page.contains("<li><a href=\"/out/0010-MR-T1.html\">0010-MR-T1</a></li>\n"));
/// assert!(page.ends_with("</ol>\n</body>\n</html>"));
/// ```
pub fn index_page(series: &[Link]) -> String {
    let mut page = String::from(PAGE_START);
    page.push_str("<h1>DICOM Study</h1>\n");
    page.push_str("<p>Select a reference series to view differences:</p>\n");
    page.push_str(LIST_START);
    for link in series {
        page.push_str(&link.to_item());
    }
    page.push_str(LIST_END);
    page.push_str(PAGE_END);
    page
}

/// Page for one reference series
///
/// Without a test series label the page only notes that nothing was
/// selected for comparison, and `instances` is ignored.
pub fn series_page(reference_label: &str, test_label: Option<&str>, instances: &[Link]) -> String {
    let mut page = String::from(PAGE_START);
    page.push_str(&format!("<h1>Reference series: {}</h1>\n", reference_label));

    match test_label {
        Some(test_label) => {
            page.push_str(&format!("<h1>Test series: {}</h1>\n", test_label));
            page.push_str("<p>Select an instance to view differences:</p>\n");
            page.push_str(LIST_START);
            for link in instances {
                page.push_str(&link.to_item());
            }
            page.push_str(LIST_END);
        }
        None => {
            page.push_str("<p>No series from test study selected for comparison</p>\n");
        }
    }

    page.push_str(PAGE_END);
    page
}

/// Page written in place of a diff when no test instance was paired
pub fn instance_placeholder(sop_instance_uid: &str) -> String {
    format!(
        "{}<h1>Instance {}</h1>\n\
         <p>No instance from test series found or selected for comparison</p>\n{}",
        PAGE_START, sop_instance_uid, PAGE_END
    )
}

/// Writes a page, closing the file before returning
pub fn write_page(path: &Path, contents: &str) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(contents.as_bytes())?;
    writer.flush()?;
    Ok(())
}
