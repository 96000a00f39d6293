use std::io::Write;

/// Completed share of a loop as a percentage, rounded to one decimal
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (1000.0 * count as f64 / total as f64).round() / 10.0
}

/// Formats a progress line
///
/// The line ends with `\r` while the loop is running so the next update
/// overwrites it, and with `\n` once `count == total`.
///
/// ```
/// use dcmdiff_core::progress::progress_line;
///
/// assert_eq!(progress_line(5, 10, ""), " [ 50%]\r");
/// assert_eq!(progress_line(10, 10, "** loading 10 files"), "** loading 10 files [100%]\n");
/// ```
pub fn progress_line(count: usize, total: usize, message: &str) -> String {
    let end = if count == total { '\n' } else { '\r' };
    format!(
        "{} [{:3}%]{}",
        message,
        percentage(count, total) as u32,
        end
    )
}

/// Prints a progress line to stdout
pub fn progress(count: usize, total: usize, message: &str) {
    let mut stdout = std::io::stdout().lock();
    // Progress output is best effort
    let _ = stdout.write_all(progress_line(count, total, message).as_bytes());
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, "doing thing", "doing thing [  0%]\r")]
    #[case(5, 10, "", " [ 50%]\r")]
    #[case(10, 10, "", " [100%]\n")]
    #[case(2, 3, "x", "x [ 66%]\r")]
    fn test_progress_line(
        #[case] count: usize,
        #[case] total: usize,
        #[case] message: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(progress_line(count, total, message), expected);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(1, 8), 12.5);
        assert_eq!(percentage(0, 0), 100.0);
    }
}
