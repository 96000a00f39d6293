use super::{Dataset, Field, FieldValue};
use dicom_core::dictionary::DataDictionary;
use dicom_core::{PrimitiveValue, VR};
use dicom_dictionary_std::StandardDataDictionary;

/// Opaque binary values up to this size are printed byte by byte
const MAX_INLINE_BYTES: usize = 32;

/// Renders a data set as newline-terminated lines, one per field
///
/// Fields nested in sequence items follow their sequence line, indented by
/// depth and prefixed with their 1-based item number.
pub fn to_lines(ds: &Dataset) -> Vec<String> {
    let mut lines = Vec::with_capacity(ds.len());
    push_lines(ds, 0, None, &mut lines);
    lines
}

fn push_lines(ds: &Dataset, depth: usize, item: Option<usize>, lines: &mut Vec<String>) {
    for field in ds.iter() {
        let mut line = String::new();
        if let Some(number) = item {
            line.push_str(&"  ".repeat(depth));
            line.push_str(&format!("[{}] ", number));
        }
        line.push_str(&field_line(field));
        line.push('\n');
        lines.push(line);

        if let Some(items) = field.items() {
            for (index, nested) in items.iter().enumerate() {
                push_lines(nested, depth + 1, Some(index + 1), lines);
            }
        }
    }
}

/// Formats a single field without nesting prefix or line terminator
///
/// ```
/// use dcmdiff_core::dataset::{field_line, Field};
/// use dicom_core::{Tag, VR};
///
/// let field = Field::new(Tag(0x0010, 0x0020), VR::LO, "ABC1234567");
/// assert_eq!(
///     field_line(&field),
///     "(0010,0020) PatientID                           LO: 'ABC1234567'"
/// );
/// ```
pub fn field_line(field: &Field) -> String {
    let keyword = StandardDataDictionary
        .by_tag(field.tag)
        .map(|entry| entry.alias)
        .unwrap_or("Unknown");

    format!(
        "({:04X},{:04X}) {:<35} {}: {}",
        field.tag.group(),
        field.tag.element(),
        keyword,
        field.vr,
        format_value(field)
    )
}

fn format_value(field: &Field) -> String {
    match &field.value {
        FieldValue::Primitive(value) => format_primitive(value, field.vr),
        FieldValue::Sequence(items) => format!("<{} item(s)>", items.len()),
        FieldValue::Fragments(count) => format!("<{} fragment(s)>", count),
    }
}

fn format_primitive(value: &PrimitiveValue, vr: VR) -> String {
    if matches!(value, PrimitiveValue::Empty) {
        return "''".to_string();
    }

    if is_opaque_vr(vr) {
        let bytes = value.to_bytes();
        if bytes.len() > MAX_INLINE_BYTES {
            return format!("<{} bytes>", bytes.len());
        }
        return bytes
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(" ");
    }

    let values = value.to_multi_str();
    let quote = is_text_vr(vr);
    let rendered: Vec<String> = values
        .iter()
        .map(|v| {
            if quote {
                format!("'{}'", v.trim_end_matches(['\0', ' ']))
            } else {
                v.to_string()
            }
        })
        .collect();

    match rendered.len() {
        1 => rendered.into_iter().next().unwrap_or_default(),
        _ => format!("[{}]", rendered.join(", ")),
    }
}

fn is_opaque_vr(vr: VR) -> bool {
    matches!(
        vr,
        VR::OB | VR::OD | VR::OF | VR::OL | VR::OV | VR::OW | VR::UN
    )
}

fn is_text_vr(vr: VR) -> bool {
    matches!(
        vr,
        VR::AE
            | VR::AS
            | VR::CS
            | VR::DA
            | VR::DS
            | VR::DT
            | VR::IS
            | VR::LO
            | VR::LT
            | VR::PN
            | VR::SH
            | VR::ST
            | VR::TM
            | VR::UC
            | VR::UI
            | VR::UR
            | VR::UT
    )
}
