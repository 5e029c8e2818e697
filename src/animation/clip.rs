use glam::{Quat, Vec3};

use crate::animation::tracks::KeyframeTrack;
use crate::animation::values::Interpolatable;
use crate::assets::RawChannel;
use crate::errors::{Result, TendonError};

/// Which transform component a track drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    Position,
    Rotation,
    Scale,
}

impl ChannelKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChannelKind::Position => "position",
            ChannelKind::Rotation => "rotation",
            ChannelKind::Scale => "scale",
        }
    }
}

/// The keyframe tracks attached to one skeleton node.
///
/// Scale keys are stored but never composed into the node transform.
#[derive(Debug, Clone, Default)]
pub struct NodeTracks {
    pub position: Option<KeyframeTrack<Vec3>>,
    pub rotation: Option<KeyframeTrack<Quat>>,
    pub scale: Option<KeyframeTrack<Vec3>>,
}

impl NodeTracks {
    /// Converts an importer channel, validating key order per track.
    pub fn from_raw(channel: &RawChannel) -> Result<Self> {
        let node = &channel.node_name;
        Ok(Self {
            position: build_track(node, ChannelKind::Position, &channel.position_keys)?,
            rotation: build_track(node, ChannelKind::Rotation, &channel.rotation_keys)?,
            scale: build_track(node, ChannelKind::Scale, &channel.scale_keys)?,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.rotation.is_none() && self.scale.is_none()
    }

    /// Latest key time across all tracks.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        let position = self.position.as_ref().map_or(0.0, KeyframeTrack::end_time);
        let rotation = self.rotation.as_ref().map_or(0.0, KeyframeTrack::end_time);
        let scale = self.scale.as_ref().map_or(0.0, KeyframeTrack::end_time);
        position.max(rotation).max(scale)
    }
}

fn build_track<T: Interpolatable>(
    node: &str,
    kind: ChannelKind,
    keys: &[(f32, T)],
) -> Result<Option<KeyframeTrack<T>>> {
    let Some(track) = KeyframeTrack::from_keys(keys.iter().copied()) else {
        return Ok(None);
    };
    track.validate().map_err(|reason| TendonError::InvalidTrack {
        node: node.to_string(),
        channel: kind.as_str(),
        reason,
    })?;
    Ok(Some(track))
}

/// Timing of the single clip a model plays.
///
/// Track times are expressed in ticks; `ticks_per_second` maps wall-clock
/// seconds onto them.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub ticks_per_second: f32,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: impl Into<String>, duration: f32, ticks_per_second: f32) -> Self {
        Self {
            name: name.into(),
            duration,
            ticks_per_second,
        }
    }

    /// Converts wall-clock seconds into clip ticks.
    #[inline]
    #[must_use]
    pub fn seconds_to_ticks(&self, seconds: f32) -> f32 {
        seconds * self.ticks_per_second
    }

    /// Clip length in seconds, or zero when the tick rate is not positive.
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        if self.ticks_per_second > 0.0 {
            self.duration / self.ticks_per_second
        } else {
            0.0
        }
    }
}
