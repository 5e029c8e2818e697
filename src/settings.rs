//! Import Settings
//!
//! This module defines how [`Model::create`](crate::Model::create) reacts to
//! inconsistencies in the scene snapshot and a few import-time defaults.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tendon::settings::{ChannelPolicy, ImportSettings, InfluencePolicy};
//!
//! // Default: lenient import, unmatched channels and extra weights are reported
//! let settings = ImportSettings::default();
//!
//! // Strict import for asset validation tools
//! let strict = ImportSettings {
//!     unmatched_channels: ChannelPolicy::Error,
//!     influence_overflow: InfluencePolicy::Error,
//!     ..Default::default()
//! };
//!
//! // Or from JSON, missing fields keep their defaults
//! let settings = ImportSettings::from_json_str(r#"{ "max_bones": 64 }"#)?;
//! ```

use serde::Deserialize;

use crate::MAX_BONES;
use crate::errors::Result;

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

/// What to do with an animation channel whose node is not in the skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelPolicy {
    /// Log a warning, record the node name in the import report and go on.
    #[default]
    Skip,
    /// Fail the import with [`TendonError::UnmatchedChannel`](crate::TendonError::UnmatchedChannel).
    Error,
}

/// What to do when a vertex receives more weights than it has slots for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfluencePolicy {
    /// Keep the first [`MAX_BONE_INFLUENCE`](crate::MAX_BONE_INFLUENCE) weights,
    /// count the dropped ones in the import report.
    #[default]
    Drop,
    /// Fail the import with [`TendonError::InfluenceOverflow`](crate::TendonError::InfluenceOverflow).
    Error,
}

// ---------------------------------------------------------------------------
// ImportSettings
// ---------------------------------------------------------------------------

/// Configuration consumed once per [`Model::create`](crate::Model::create).
///
/// # Fields
///
/// | Field                      | Description                                   | Default     |
/// |----------------------------|-----------------------------------------------|-------------|
/// | `max_bones`                | Bone ceiling, clamped to `MAX_BONES`          | `MAX_BONES` |
/// | `unmatched_channels`       | Channel without skeleton node                 | `Skip`      |
/// | `influence_overflow`       | More than 4 weights on a vertex               | `Drop`      |
/// | `default_ticks_per_second` | Tick rate when the clip reports none          | `25.0`      |
/// | `flip_textures_vertically` | Flip decoded images to bottom-left origin     | `true`      |
/// | `load_textures`            | Decode and upload diffuse textures            | `true`      |
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Largest bone count accepted before the import fails.
    pub max_bones: usize,

    pub unmatched_channels: ChannelPolicy,

    pub influence_overflow: InfluencePolicy,

    /// Used when the scene reports a tick rate of zero.
    pub default_ticks_per_second: f32,

    pub flip_textures_vertically: bool,

    /// When `false`, materials get no texture handle (headless tools).
    pub load_textures: bool,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_bones: MAX_BONES,
            unmatched_channels: ChannelPolicy::Skip,
            influence_overflow: InfluencePolicy::Drop,
            default_ticks_per_second: 25.0,
            flip_textures_vertically: true,
            load_textures: true,
        }
    }
}

impl ImportSettings {
    /// Parses settings from JSON; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Bone ceiling actually enforced.
    #[inline]
    #[must_use]
    pub fn effective_max_bones(&self) -> usize {
        self.max_bones.min(MAX_BONES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings =
            ImportSettings::from_json_str(r#"{ "max_bones": 32, "unmatched_channels": "error" }"#)
                .unwrap();

        assert_eq!(settings.max_bones, 32);
        assert_eq!(settings.unmatched_channels, ChannelPolicy::Error);
        assert_eq!(settings.influence_overflow, InfluencePolicy::Drop);
        assert!(settings.load_textures);
    }

    #[test]
    fn max_bones_is_clamped() {
        let settings = ImportSettings {
            max_bones: 4096,
            ..Default::default()
        };
        assert_eq!(settings.effective_max_bones(), MAX_BONES);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ImportSettings::from_json_str("{ max_bones: }").is_err());
    }
}
