//! Decoded record model
//!
//! The comparison pipeline never works on `dicom-object` types directly.
//! Each decoded file is converted once into an [`InstanceRecord`]: a
//! file-meta [`Dataset`] plus the main [`Dataset`], both ordered by tag.
//! Filters build new datasets from the fields they keep instead of
//! deleting entries while walking.

mod dump;
mod record;
pub mod tags;

pub use dump::{field_line, to_lines};
pub use record::{is_directory_index, InstanceKey, InstanceRecord};

use dicom_core::header::Header;
use dicom_core::value::Value;
use dicom_core::{PrimitiveValue, Tag, VR};
use dicom_object::InMemDicomObject;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Value held by a [`Field`]
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain value (text, numbers, bytes)
    Primitive(PrimitiveValue),
    /// Sequence of nested data sets
    Sequence(Vec<Dataset>),
    /// Encapsulated pixel data, only the fragment count is kept
    Fragments(usize),
}

/// A single attribute: tag, value representation and value
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub tag: Tag,
    pub vr: VR,
    pub value: FieldValue,
}

impl Field {
    /// Creates a primitive field
    pub fn new(tag: Tag, vr: VR, value: impl Into<PrimitiveValue>) -> Self {
        Self {
            tag,
            vr,
            value: FieldValue::Primitive(value.into()),
        }
    }

    /// Creates a sequence field
    pub fn sequence(tag: Tag, items: Vec<Dataset>) -> Self {
        Self {
            tag,
            vr: VR::SQ,
            value: FieldValue::Sequence(items),
        }
    }

    /// Private attributes live in odd groups
    pub fn is_private(&self) -> bool {
        self.tag.group() % 2 == 1
    }

    /// Nested items, if this is a sequence
    pub fn items(&self) -> Option<&[Dataset]> {
        match &self.value {
            FieldValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Textual value; multiple values are joined with a backslash
    pub fn to_str(&self) -> Option<Cow<'_, str>> {
        match &self.value {
            FieldValue::Primitive(v) => Some(v.to_str()),
            _ => None,
        }
    }

    /// Single integer value, parsed from its text form
    pub fn to_int(&self) -> Option<i32> {
        self.to_str()?.trim().parse().ok()
    }
}

/// Tag-ordered collection of fields
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    fields: BTreeMap<Tag, Field>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, returning the one it replaced
    pub fn put(&mut self, field: Field) -> Option<Field> {
        self.fields.insert(field.tag, field)
    }

    pub fn get(&self, tag: Tag) -> Option<&Field> {
        self.fields.get(&tag)
    }

    pub fn remove(&mut self, tag: Tag) -> Option<Field> {
        self.fields.remove(&tag)
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.fields.contains_key(&tag)
    }

    /// Top-level fields in tag order
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields including those nested in sequence items
    pub fn total_len(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_, _| count += 1);
        count
    }

    /// Visits every field depth-first, nested items right after their sequence
    ///
    /// The second callback argument is the nesting depth (0 for top level).
    pub fn walk<F>(&self, visit: &mut F)
    where
        F: FnMut(&Field, usize),
    {
        self.walk_at(0, visit);
    }

    fn walk_at<F>(&self, depth: usize, visit: &mut F)
    where
        F: FnMut(&Field, usize),
    {
        for field in self.fields.values() {
            visit(field, depth);
            if let Some(items) = field.items() {
                for item in items {
                    item.walk_at(depth + 1, visit);
                }
            }
        }
    }

    /// Rebuilds the data set keeping only the fields accepted by `keep`
    ///
    /// Applies at every nesting level. A rejected sequence drops its items
    /// with it; a kept sequence has its items rebuilt the same way.
    pub fn retain<F>(&self, keep: &F) -> Dataset
    where
        F: Fn(&Field) -> bool,
    {
        self.fields
            .values()
            .filter(|field| keep(field))
            .map(|field| match &field.value {
                FieldValue::Sequence(items) => Field {
                    tag: field.tag,
                    vr: field.vr,
                    value: FieldValue::Sequence(
                        items.iter().map(|item| item.retain(keep)).collect(),
                    ),
                },
                _ => field.clone(),
            })
            .collect()
    }

    /// Converts a decoded `dicom-object` data set
    pub fn from_dicom(obj: &InMemDicomObject) -> Self {
        obj.iter()
            .map(|elem| {
                let value = match elem.value() {
                    Value::Primitive(v) => FieldValue::Primitive(v.clone()),
                    Value::Sequence(seq) => {
                        FieldValue::Sequence(seq.items().iter().map(Dataset::from_dicom).collect())
                    }
                    Value::PixelSequence(seq) => FieldValue::Fragments(seq.fragments().len()),
                };
                Field {
                    tag: elem.tag(),
                    vr: elem.vr(),
                    value,
                }
            })
            .collect()
    }
}

impl FromIterator<Field> for Dataset {
    fn from_iter<T: IntoIterator<Item = Field>>(iter: T) -> Self {
        let mut dataset = Dataset::new();
        for field in iter {
            dataset.put(field);
        }
        dataset
    }
}
