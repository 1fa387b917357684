//! The parsed tag container.
//!
//! A [`TagSet`] is an owned, string-keyed map of tag values assembled from a
//! kamadak-exif container and the file's XMP packet. Extraction functions
//! only read from it, so one container can serve any number of lookups.

use crate::{xmp, Result};
use exif::{In, Reader, Value};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

/// A single parsed tag value.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Text value (ASCII EXIF fields, XMP attributes).
    Text(String),
    /// Integer value (byte/short/long EXIF fields).
    Int(i64),
    /// Single floating-point value.
    Real(f64),
    /// Multi-component rational value, e.g. a GPS degrees/minutes/seconds
    /// triplet.
    RealVec(Vec<f64>),
}

impl TagValue {
    /// The value as text, if it is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer. Text is parsed; reals are not truncated.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TagValue::Int(v) => Some(*v),
            TagValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The value as a floating-point number.
    ///
    /// Integers widen, text parses (leading `+` signs included, as written
    /// by drone XMP blocks), and multi-component values yield their first
    /// component.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            TagValue::Real(v) => Some(*v),
            TagValue::Int(v) => Some(*v as f64),
            TagValue::Text(s) => s.trim().parse().ok(),
            TagValue::RealVec(v) => v.first().copied(),
        }
    }

    /// The value as a component slice.
    pub fn as_real_vec(&self) -> Option<&[f64]> {
        match self {
            TagValue::RealVec(v) => Some(v),
            _ => None,
        }
    }
}

/// A parsed tag container for one file.
#[derive(Debug, Default, Clone)]
pub struct TagSet {
    tags: HashMap<String, TagValue>,
}

impl TagSet {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the tag container of a file: the EXIF directory plus any XMP
    /// packet attributes.
    ///
    /// Fails only when the file cannot be read or the EXIF structure is
    /// corrupt; a file without EXIF data at all is also an error from the
    /// underlying reader and should be treated by callers as "no tags".
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        let exif = Reader::new().read_from_container(&mut Cursor::new(&data))?;

        let mut set = Self::new();
        for field in exif.fields() {
            if field.ifd_num != In::PRIMARY {
                continue;
            }
            if let Some(value) = convert_value(&field.value) {
                set.insert(field.tag.to_string(), value);
            }
        }
        xmp::scan_xmp_attributes(&data, &mut set);
        Ok(set)
    }

    /// Insert or replace a tag.
    pub fn insert(&mut self, key: impl Into<String>, value: TagValue) {
        self.tags.insert(key.into(), value);
    }

    /// Look up a single key.
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    /// Return the first present tag among an ordered list of aliases.
    ///
    /// Camera vendors disagree on tag names; every extraction function goes
    /// through this lookup with its alias list instead of hand-rolling the
    /// search.
    pub fn first(&self, aliases: &[&str]) -> Option<&TagValue> {
        aliases.iter().find_map(|key| self.tags.get(*key))
    }

    /// Number of tags in the container.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// True when the container holds no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Convert a kamadak-exif value into a [`TagValue`].
fn convert_value(value: &Value) -> Option<TagValue> {
    match value {
        Value::Ascii(vs) => vs
            .first()
            .and_then(|raw| std::str::from_utf8(raw).ok())
            .map(|s| TagValue::Text(s.trim_matches('\u{0}').trim().to_string())),
        Value::Byte(vs) => vs.first().map(|&v| TagValue::Int(v as i64)),
        Value::Short(vs) => vs.first().map(|&v| TagValue::Int(v as i64)),
        Value::Long(vs) => vs.first().map(|&v| TagValue::Int(v as i64)),
        Value::SByte(vs) => vs.first().map(|&v| TagValue::Int(v as i64)),
        Value::SShort(vs) => vs.first().map(|&v| TagValue::Int(v as i64)),
        Value::SLong(vs) => vs.first().map(|&v| TagValue::Int(v as i64)),
        Value::Float(vs) => vs.first().map(|&v| TagValue::Real(v as f64)),
        Value::Double(vs) => vs.first().map(|&v| TagValue::Real(v)),
        Value::Rational(vs) => match vs.len() {
            0 => None,
            1 => Some(TagValue::Real(vs[0].to_f64())),
            _ => Some(TagValue::RealVec(vs.iter().map(|r| r.to_f64()).collect())),
        },
        Value::SRational(vs) => match vs.len() {
            0 => None,
            1 => Some(TagValue::Real(vs[0].to_f64())),
            _ => Some(TagValue::RealVec(vs.iter().map(|r| r.to_f64()).collect())),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_respects_alias_order() {
        let mut tags = TagSet::new();
        tags.insert("Camera:Pitch", TagValue::Real(-45.0));
        tags.insert("drone-dji:GimbalPitchDegree", TagValue::Text("-90.0".into()));

        let v = tags
            .first(&["drone-dji:GimbalPitchDegree", "Camera:Pitch"])
            .unwrap();
        assert_eq!(v.as_real(), Some(-90.0));

        let v = tags.first(&["Missing", "Camera:Pitch"]).unwrap();
        assert_eq!(v.as_real(), Some(-45.0));

        assert!(tags.first(&["Missing", "AlsoMissing"]).is_none());
    }

    #[test]
    fn test_text_coercions() {
        let v = TagValue::Text("+23.50".into());
        assert_eq!(v.as_real(), Some(23.5));

        let v = TagValue::Text("6".into());
        assert_eq!(v.as_int(), Some(6));

        let v = TagValue::Text("not a number".into());
        assert_eq!(v.as_real(), None);
    }

    #[test]
    fn test_real_vec_first_component() {
        let v = TagValue::RealVec(vec![45.0, 30.0, 0.0]);
        assert_eq!(v.as_real(), Some(45.0));
        assert_eq!(v.as_real_vec().unwrap().len(), 3);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(TagSet::from_path("/nonexistent/file.jpg").is_err());
    }
}
