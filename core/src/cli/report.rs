use crate::compare::ComparisonSummary;
use std::fmt;

/// Text report printed at the end of a run
pub struct SummaryReport<'a> {
    summary: &'a ComparisonSummary,
}

impl<'a> SummaryReport<'a> {
    /// Creates a new summary report
    pub fn new(summary: &'a ComparisonSummary) -> Self {
        Self { summary }
    }
}

impl<'a> fmt::Display for SummaryReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Comparison Summary")?;
        writeln!(f, "==================")?;
        writeln!(f)?;
        writeln!(f, "Series:              {}", self.summary.series)?;
        writeln!(f, "Unmatched series:    {}", self.summary.unmatched_series)?;
        writeln!(f, "Instances compared:  {}", self.summary.instances)?;
        writeln!(
            f,
            "Unmatched instances: {}",
            self.summary.unmatched_instances
        )?;
        writeln!(f)?;
        writeln!(f, "Report: {}", self.summary.index_path.display())?;

        Ok(())
    }
}
