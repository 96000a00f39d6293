//! HTML report output
//!
//! A run writes one study index, one page per reference series and one page
//! per compared reference instance. Pages link to each other through
//! absolute paths inside the output directory.

mod diff;
mod html;

pub use diff::{render_html_diff, DiffMode};
pub use html::{
    index_page, instance_file_name, instance_placeholder, series_file_name, series_page, write_page,
    Link, STUDY_INDEX_FILE,
};

/// Escapes text for use inside HTML element content or attribute values
///
/// ```
/// use dcmdiff_core::report::escape;
///
/// assert_eq!(escape("(0008,0060) 'MR' <a & b>"), "(0008,0060) &#39;MR&#39; &lt;a &amp; b&gt;");
/// ```
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
