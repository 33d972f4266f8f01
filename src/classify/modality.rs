//! Coarse modality classification

use strum::{AsRefStr, Display, EnumString};

use super::{ancestors, extract_extension, filename, remove_extension};

/// Extension of the simulation software output files
pub const SIMULATION_EXTENSION: &str = ".smash";

/// Types that are derivatives without being produced by [`extract_type`]
///
/// These are only ever set through record overrides.
pub const DERIVATIVE_ONLY_TYPES: &[&str] = &["modelling", "simulation", "misc"];

/// Modality type assigned from filename and directory keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Modality {
    Anat,
    AnatSegmentation,
    Ct,
    CtSegmentation,
    Func,
    Simulation,
    /// No rule matched
    #[strum(serialize = "")]
    Unknown,
}

impl Modality {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn is_segmentation(&self) -> bool {
        matches!(self, Self::AnatSegmentation | Self::CtSegmentation)
    }
}

/// Lower-cased underscore keywords of a path fragment
fn keywords(fragment: &str) -> impl Iterator<Item = String> + '_ {
    fragment.split('_').map(str::to_lowercase)
}

/// Classify the modality of `path`
///
/// Rules, first match wins:
/// 1. a `ct` keyword gives `ct`, or `ct_segmentation` along with `seg`
/// 2. the simulation extension gives `simulation`
/// 3. `restingstate` or `fmri` gives `func`
/// 4. `mri` gives `anat`, or `anat_segmentation` along with a `seg` or
///    `mask` filename keyword or a `tissues` directory keyword
pub fn extract_type(path: &str) -> Modality {
    let name: Vec<String> = keywords(remove_extension(filename(path))).collect();
    let has = |word: &str| name.iter().any(|k| k == word);

    if has("ct") {
        return if has("seg") {
            Modality::CtSegmentation
        } else {
            Modality::Ct
        };
    }

    if extract_extension(path) == SIMULATION_EXTENSION {
        return Modality::Simulation;
    }

    if has("restingstate") || has("fmri") {
        return Modality::Func;
    }

    if has("mri") {
        let tissues_dir = ancestors(path).flat_map(keywords).any(|k| k == "tissues");
        return if has("seg") || has("mask") || tissues_dir {
            Modality::AnatSegmentation
        } else {
            Modality::Anat
        };
    }

    Modality::Unknown
}

/// Returns true if files of type `kind` belong under `derivatives/`
pub fn is_derivative(kind: &str) -> bool {
    kind.contains("segmentation") || DERIVATIVE_ONLY_TYPES.contains(&kind)
}
