//! Parsing of user-supplied field identifiers
//!
//! Tags may be given as a dictionary keyword (`RepetitionTime`), as a
//! combined hexadecimal group/element number (`0x00180080` or
//! `00180080`) or in the bracketed form (`(0018,0080)`).

use crate::error::{DcmdiffError, Result};
use dicom_core::dictionary::DataDictionary;
use dicom_core::{Tag, VR};
use dicom_dictionary_std::StandardDataDictionary;
use log::warn;
use std::path::Path;

/// Parses a keyword or hexadecimal group/element pair into a tag
///
/// ```
/// use dcmdiff_core::tagspec::parse_tag;
/// use dicom_core::Tag;
///
/// assert_eq!(parse_tag("RepetitionTime").unwrap(), Tag(0x0018, 0x0080));
/// assert_eq!(parse_tag("0x00100010").unwrap(), Tag(0x0010, 0x0010));
/// assert!(parse_tag("EchTime").is_err());
/// ```
pub fn parse_tag(text: &str) -> Result<Tag> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DcmdiffError::InvalidTag(text.to_string()));
    }

    if let Some(entry) = StandardDataDictionary.by_name(trimmed) {
        return Ok(entry.tag.inner());
    }

    let hex = strip_hex_prefix(trimmed);
    if !hex.is_empty() && hex.len() <= 8 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        if let Ok(value) = u32::from_str_radix(hex, 16) {
            return Ok(Tag((value >> 16) as u16, (value & 0xFFFF) as u16));
        }
    }

    StandardDataDictionary
        .parse_tag(trimmed)
        .ok_or_else(|| DcmdiffError::InvalidTag(text.to_string()))
}

/// Parses a hexadecimal group number such as `0x0010`
pub fn parse_group(text: &str) -> Result<u16> {
    let hex = strip_hex_prefix(text.trim());
    u16::from_str_radix(hex, 16).map_err(|_| DcmdiffError::InvalidGroup(text.to_string()))
}

/// Parses a two-letter value representation code, case-insensitively
pub fn parse_vr(text: &str) -> Result<VR> {
    let code = text.trim().to_ascii_uppercase();
    match code.as_bytes() {
        [a, b] => VR::from_binary([*a, *b]),
        _ => None,
    }
    .ok_or_else(|| DcmdiffError::InvalidVr(text.to_string()))
}

fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

/// Reads a tag-list file, one identifier per line
///
/// Lines that cannot be parsed are reported as warnings and skipped.
///
/// # Errors
///
/// - [`DcmdiffError::TagFileMissing`] if the file does not exist
/// - [`DcmdiffError::EmptyTagFile`] if no line yields a tag
pub fn read_tag_file(path: &Path) -> Result<Vec<Tag>> {
    if !path.is_file() {
        return Err(DcmdiffError::TagFileMissing(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    let tags = parse_tag_lines(&contents, |err| {
        warn!("{}", err);
        eprintln!("WARNING: {}", err);
    });

    if tags.is_empty() {
        return Err(DcmdiffError::EmptyTagFile(path.to_path_buf()));
    }

    Ok(tags)
}

/// Parses tag-list contents, handing each bad line's error to `on_error`
///
/// Blank lines are ignored.
pub fn parse_tag_lines<F>(contents: &str, mut on_error: F) -> Vec<Tag>
where
    F: FnMut(DcmdiffError),
{
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_tag(line) {
            Ok(tag) => Some(tag),
            Err(e) => {
                on_error(e);
                None
            }
        })
        .collect()
}
