use super::escape;
use similar::{capture_diff_slices, group_diff_ops, Algorithm, DiffOp};

/// How much of the two projections a diff page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiffMode {
    /// Every line of both sides
    #[default]
    Full,
    /// Only changed lines plus `lines` lines of context around each change
    Context { lines: usize },
}

const STYLE: &str = "<style type=\"text/css\">\n\
    table.diff {font-family:Courier; border:medium;}\n\
    .diff_header {background-color:#e0e0e0;}\n\
    td.diff_header {text-align:right;}\n\
    tr.delete td.line_ref {background-color:#ffaaaa;}\n\
    tr.insert td.line_test {background-color:#aaffaa;}\n\
    tr.changed td.line_ref, tr.changed td.line_test {background-color:#ffff77;}\n\
    tr.skip td {text-align:center; background-color:#f0f0f0;}\n\
    </style>\n";

/// Renders a side-by-side HTML page comparing two line sequences
///
/// The left column is the reference, the right column the test side.
///
/// ```
/// use dcmdiff_core::report::{render_html_diff, DiffMode};
///
/// let reference = vec!["a\n".to_string(), "b\n".to_string()];
/// let test = vec!["a\n".to_string(), "c\n".to_string()];
/// let page = render_html_diff(&reference, &test, DiffMode::Full);
/// assert!(page.contains("<tr class=\"changed\">"));
/// ```
pub fn render_html_diff(reference: &[String], test: &[String], mode: DiffMode) -> String {
    let ops = capture_diff_slices(Algorithm::Myers, reference, test);

    let mut page = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str(STYLE);
    page.push_str("</head>\n<body>\n");
    page.push_str("<table class=\"diff\">\n");
    page.push_str(
        "<thead><tr><th class=\"diff_header\" colspan=\"2\">Reference</th>\
         <th class=\"diff_header\" colspan=\"2\">Test</th></tr></thead>\n",
    );
    page.push_str("<tbody>\n");

    match mode {
        DiffMode::Full => {
            for op in &ops {
                push_rows(&mut page, op, reference, test);
            }
        }
        DiffMode::Context { lines } => {
            let groups = group_diff_ops(ops, lines);
            if groups.is_empty() {
                page.push_str(
                    "<tr class=\"skip\"><td colspan=\"4\">No Differences Found</td></tr>\n",
                );
            }
            for (index, group) in groups.iter().enumerate() {
                if index > 0 {
                    page.push_str("<tr class=\"skip\"><td colspan=\"4\">...</td></tr>\n");
                }
                for op in group {
                    push_rows(&mut page, op, reference, test);
                }
            }
        }
    }

    page.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    page
}

fn push_rows(page: &mut String, op: &DiffOp, reference: &[String], test: &[String]) {
    match *op {
        DiffOp::Equal {
            old_index,
            new_index,
            len,
        } => {
            for i in 0..len {
                push_row(
                    page,
                    "equal",
                    Some((old_index + i, &reference[old_index + i])),
                    Some((new_index + i, &test[new_index + i])),
                );
            }
        }
        DiffOp::Delete {
            old_index, old_len, ..
        } => {
            for i in old_index..old_index + old_len {
                push_row(page, "delete", Some((i, &reference[i])), None);
            }
        }
        DiffOp::Insert {
            new_index, new_len, ..
        } => {
            for i in new_index..new_index + new_len {
                push_row(page, "insert", None, Some((i, &test[i])));
            }
        }
        DiffOp::Replace {
            old_index,
            old_len,
            new_index,
            new_len,
        } => {
            for i in 0..old_len.max(new_len) {
                let left = (i < old_len).then(|| (old_index + i, &reference[old_index + i]));
                let right = (i < new_len).then(|| (new_index + i, &test[new_index + i]));
                push_row(page, "changed", left, right);
            }
        }
    }
}

fn push_row(
    page: &mut String,
    class: &str,
    left: Option<(usize, &String)>,
    right: Option<(usize, &String)>,
) {
    page.push_str(&format!("<tr class=\"{}\">", class));
    push_cells(page, "line_ref", left);
    push_cells(page, "line_test", right);
    page.push_str("</tr>\n");
}

fn push_cells(page: &mut String, class: &str, line: Option<(usize, &String)>) {
    match line {
        Some((index, text)) => page.push_str(&format!(
            "<td class=\"diff_header\">{}</td><td class=\"{}\" nowrap=\"nowrap\">{}</td>",
            index + 1,
            class,
            escape(text.trim_end_matches('\n'))
        )),
        None => page.push_str(&format!(
            "<td class=\"diff_header\"></td><td class=\"{}\"></td>",
            class
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|l| format!("{}\n", l)).collect()
    }

    fn count(page: &str, needle: &str) -> usize {
        page.matches(needle).count()
    }

    #[test]
    fn test_full_mode_shows_all_lines() {
        let reference = lines(&["a", "b", "c", "d"]);
        let test = lines(&["a", "b", "x", "d"]);
        let page = render_html_diff(&reference, &test, DiffMode::Full);

        assert_eq!(count(&page, "<tr class=\"equal\">"), 3);
        assert_eq!(count(&page, "<tr class=\"changed\">"), 1);
        assert!(page.contains(">Reference</th>"));
        assert!(page.contains(">Test</th>"));
    }

    #[test]
    fn test_context_mode_limits_lines() {
        let reference = lines(&["a", "b", "c", "d", "e", "f", "g"]);
        let test = lines(&["a", "b", "c", "X", "e", "f", "g"]);
        let page = render_html_diff(&reference, &test, DiffMode::Context { lines: 1 });

        assert_eq!(count(&page, "<tr class=\"equal\">"), 2);
        assert_eq!(count(&page, "<tr class=\"changed\">"), 1);
        assert!(!page.contains(">a</td>"));
    }

    #[test]
    fn test_context_mode_without_differences() {
        let reference = lines(&["a", "b"]);
        let page = render_html_diff(&reference, &reference, DiffMode::Context { lines: 1 });
        assert!(page.contains("No Differences Found"));
        assert_eq!(count(&page, "<tr class=\"equal\">"), 0);
    }

    #[test]
    fn test_insert_and_delete_rows() {
        let reference = lines(&["a", "b"]);
        let test = lines(&["b", "c"]);
        let page = render_html_diff(&reference, &test, DiffMode::Full);

        assert_eq!(count(&page, "<tr class=\"delete\">"), 1);
        assert_eq!(count(&page, "<tr class=\"insert\">"), 1);
    }

    #[test]
    fn test_lines_are_escaped() {
        let reference = lines(&["(0008,0060) Modality CS: 'MR'"]);
        let test = lines(&["(0008,0060) Modality CS: '<CT>'"]);
        let page = render_html_diff(&reference, &test, DiffMode::Full);

        assert!(page.contains("&#39;&lt;CT&gt;&#39;"));
        assert!(!page.contains("'<CT>'"));
    }
}
