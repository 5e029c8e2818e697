use glam::{Quat, Vec3, Vec4};

/// Below this `sin θ` the two rotations are treated as parallel and blended linearly.
pub const SLERP_LINEAR_THRESHOLD: f32 = 0.001;

/// Values a [`KeyframeTrack`](super::KeyframeTrack) can carry.
pub trait Interpolatable: Copy + Clone + Sized {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for Vec3 {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        slerp(start, end, t)
    }
}

/// Spherical linear interpolation between two unit quaternions.
///
/// Edge cases, in evaluation order:
/// - `|cos θ| >= 1`: `from` is returned unchanged.
/// - `cos θ < 0`: `from` is negated so the blend takes the short arc.
/// - `sin θ < SLERP_LINEAR_THRESHOLD`: componentwise lerp, not renormalized.
#[must_use]
pub fn slerp(from: Quat, to: Quat, t: f32) -> Quat {
    let mut q1 = Vec4::from(from);
    let q2 = Vec4::from(to);

    let mut cos_theta = q1.dot(q2);
    if cos_theta.abs() >= 1.0 {
        return from;
    }
    if cos_theta < 0.0 {
        q1 = -q1;
        cos_theta = -cos_theta;
    }

    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    if sin_theta.abs() < SLERP_LINEAR_THRESHOLD {
        return Quat::from_vec4(q1.lerp(q2, t));
    }

    let angle = cos_theta.acos();
    let blended = q1 * ((1.0 - t) * angle).sin() + q2 * (t * angle).sin();
    Quat::from_vec4(blended / sin_theta)
}
