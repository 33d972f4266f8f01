/*!
 * Core types and data structures for bidsort
 */

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compose::{generate_new_path, NewPathParts};
use crate::error::{BidsortError, Result};

/// Metadata derived for one source file, along with its canonical path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Original path under the source tree
    pub old_path: String,
    /// Acquisition id, possibly empty
    pub id: String,
    /// Canonical subject code
    pub sub: String,
    /// Modality type, possibly empty
    #[serde(rename = "type")]
    pub kind: String,
    /// Extension with its leading dot, possibly empty
    pub extension: String,
    /// Secondary category tag, possibly empty
    pub category: String,
    /// Segmentation target, only set for segmentation types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seg_info: Option<String>,
    /// Acquisition sequence tag, possibly empty
    pub suffix: String,
    pub is_tmp: bool,
    pub is_localizer: bool,
    pub is_other: bool,
    pub is_a_previous_version: bool,
    /// Canonical target path, computed from every other field
    pub new_path: String,
}

impl FileRecord {
    /// Inputs of the path composer taken from this record
    pub fn path_parts(&self) -> NewPathParts<'_> {
        NewPathParts {
            old_path: &self.old_path,
            id: &self.id,
            sub: &self.sub,
            kind: &self.kind,
            extension: &self.extension,
            category: &self.category,
            seg_info: self.seg_info.as_deref().unwrap_or_default(),
            suffix: &self.suffix,
            is_tmp: self.is_tmp,
            is_localizer: self.is_localizer,
            is_other: self.is_other,
            is_a_previous_version: self.is_a_previous_version,
        }
    }

    /// Recompute `new_path` after fields were edited
    pub fn refresh_new_path(&mut self) {
        self.new_path = generate_new_path(&self.path_parts());
    }

    /// Filename part of the original path
    pub fn old_filename(&self) -> &str {
        self.old_path.rsplit('/').next().unwrap_or(&self.old_path)
    }
}

/// Field values forced onto a record instead of being derived
///
/// `None` means derive the field from the path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Overrides {
    pub id: Option<String>,
    pub sub: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub extension: Option<String>,
    pub category: Option<String>,
    pub seg_info: Option<String>,
    pub suffix: Option<String>,
    pub is_tmp: Option<bool>,
    pub is_localizer: Option<bool>,
    pub is_other: Option<bool>,
    pub is_a_previous_version: Option<bool>,
}

impl Overrides {
    /// Set one field from its record name and a textual value
    pub fn set(&mut self, field: &str, value: &str) -> Result<()> {
        let text = || Some(value.to_string());
        let flag = || {
            bool::from_str(value).map(Some).map_err(|_| {
                BidsortError::InvalidOverride(format!("{field} expects true or false, got {value:?}"))
            })
        };

        match field {
            "id" => self.id = text(),
            "sub" => self.sub = text(),
            "type" => self.kind = text(),
            "extension" => self.extension = text(),
            "category" => self.category = text(),
            "seg_info" => self.seg_info = text(),
            "suffix" => self.suffix = text(),
            "is_tmp" => self.is_tmp = flag()?,
            "is_localizer" => self.is_localizer = flag()?,
            "is_other" => self.is_other = flag()?,
            "is_a_previous_version" => self.is_a_previous_version = flag()?,
            other => {
                return Err(BidsortError::InvalidOverride(format!(
                    "unknown field {other:?}"
                )))
            }
        }
        Ok(())
    }

    /// Parse a `field=value` assignment
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<()> {
        let (field, value) = assignment.split_once('=').ok_or_else(|| {
            BidsortError::InvalidOverride(format!("expected field=value, got {assignment:?}"))
        })?;
        self.set(field.trim(), value.trim())
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FileRecord {
        FileRecord {
            old_path: "/study/P01_mri_20230101000000_3.nii.gz".to_string(),
            id: "3".to_string(),
            sub: "sub-01".to_string(),
            kind: "anat".to_string(),
            extension: ".nii.gz".to_string(),
            category: String::new(),
            seg_info: None,
            suffix: String::new(),
            is_tmp: false,
            is_localizer: false,
            is_other: false,
            is_a_previous_version: false,
            new_path: String::new(),
        }
    }

    #[test]
    fn serializes_with_record_field_names() {
        let value = serde_json::to_value(record()).unwrap();
        assert_eq!(value["type"], "anat");
        assert!(value.get("kind").is_none());
        assert!(value.get("seg_info").is_none());
    }

    #[test]
    fn deserializes_without_seg_info() {
        let mut value = serde_json::to_value(record()).unwrap();
        value["new_path"] = "x".into();
        let parsed: FileRecord = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.seg_info, None);
        assert_eq!(parsed.new_path, "x");
    }

    #[test]
    fn refresh_recomputes_new_path() {
        let mut rec = record();
        rec.refresh_new_path();
        assert_eq!(rec.new_path, "sub-01/anat/sub-01_id-3.nii.gz");

        rec.suffix = "t2_tse".to_string();
        rec.refresh_new_path();
        assert_eq!(rec.new_path, "sub-01/anat/sub-01_id-3_t2_tse.nii.gz");
    }

    #[test]
    fn overrides_from_assignments() {
        let mut overrides = Overrides::default();
        assert!(overrides.is_empty());
        overrides.apply_assignment("type=modelling").unwrap();
        overrides.apply_assignment("is_other = true").unwrap();
        assert_eq!(overrides.kind.as_deref(), Some("modelling"));
        assert_eq!(overrides.is_other, Some(true));

        assert!(overrides.apply_assignment("is_tmp=maybe").is_err());
        assert!(overrides.apply_assignment("colour=blue").is_err());
        assert!(overrides.apply_assignment("sub").is_err());
    }

    #[test]
    fn overrides_from_json() {
        let overrides: Overrides =
            serde_json::from_str(r#"{"type": "misc", "is_localizer": false}"#).unwrap();
        assert_eq!(overrides.kind.as_deref(), Some("misc"));
        assert_eq!(overrides.is_localizer, Some(false));
        assert!(serde_json::from_str::<Overrides>(r#"{"new_path": "x"}"#).is_err());
    }
}
