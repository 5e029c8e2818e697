//! Utility Module
//!
//! - [`FlyCamera`]: first-person camera driven by keyboard and gamepad events
//! - [`FrameTimer`]: per-frame timestep and frame rate

pub mod fly_control;
pub mod time;

pub use fly_control::{Axis, Direction, FlyCamera, InputEvent, Key, PadButton};
pub use time::FrameTimer;
