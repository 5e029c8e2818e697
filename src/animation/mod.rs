pub mod clip;
pub mod player;
pub mod tracks;
pub mod values;

pub use clip::{AnimationClip, ChannelKind, NodeTracks};
pub use player::{AnimationPlayer, wrap_time};
pub use tracks::{KEYFRAME_EPSILON, KeyframeTrack};
pub use values::{Interpolatable, slerp};
