//! Animation Tests
//!
//! Tests for:
//! - KeyframeTrack bracketing, interpolation bounds and extrapolation
//! - Quaternion slerp edge cases
//! - NodeTracks conversion and validation
//! - AnimationPlayer time accumulation and wrapping

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3, Vec4};

use tendon::TendonError;
use tendon::animation::{
    AnimationClip, AnimationPlayer, KeyframeTrack, NodeTracks, slerp, wrap_time,
};
use tendon::assets::RawChannel;

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    a.abs_diff_eq(b, EPSILON)
}

fn same_rotation(a: Quat, b: Quat) -> bool {
    a.angle_between(b) < 1e-3
}

// ============================================================================
// KeyframeTrack: Vec3
// ============================================================================

#[test]
fn track_vec3_midpoint() {
    let track = KeyframeTrack::new(vec![0.0, 10.0], vec![Vec3::ZERO, Vec3::new(10.0, 0.0, -4.0)]);
    assert!(approx_vec3(track.sample(5.0), Vec3::new(5.0, 0.0, -2.0)));
}

#[test]
fn track_vec3_exact_keyframes() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![Vec3::ZERO, Vec3::X, Vec3::new(3.0, 0.0, 0.0)],
    );

    assert!(approx_vec3(track.sample(0.0), Vec3::ZERO));
    assert!(approx_vec3(track.sample(1.0), Vec3::X));
    assert!(approx_vec3(track.sample(2.0), Vec3::new(3.0, 0.0, 0.0)));
}

#[test]
fn track_vec3_stays_within_bracketing_values() {
    let values = vec![
        Vec3::new(0.0, 5.0, -1.0),
        Vec3::new(2.0, -5.0, 1.0),
        Vec3::new(-4.0, 0.0, 8.0),
    ];
    let track = KeyframeTrack::new(vec![0.0, 3.0, 7.0], values.clone());

    let mut time = 0.0;
    while time <= 7.0 {
        let (prev, next) = track.bracket(time);
        let lo = values[prev].min(values[next]) - Vec3::splat(EPSILON);
        let hi = values[prev].max(values[next]) + Vec3::splat(EPSILON);
        let v = track.sample(time);
        assert!(v.cmpge(lo).all() && v.cmple(hi).all(), "{v} outside [{lo}, {hi}] at {time}");
        time += 0.25;
    }
}

#[test]
fn track_extrapolates_outside_range() {
    let track = KeyframeTrack::new(vec![0.0, 10.0], vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]);

    assert!(approx_vec3(track.sample(15.0), Vec3::new(15.0, 0.0, 0.0)));
    assert!(approx_vec3(track.sample(-5.0), Vec3::new(-5.0, 0.0, 0.0)));
}

#[test]
fn track_past_end_uses_last_two_keys() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![Vec3::ZERO, Vec3::ZERO, Vec3::Y],
    );

    assert_eq!(track.bracket(5.0), (1, 2));
    assert!(approx_vec3(track.sample(3.0), Vec3::new(0.0, 2.0, 0.0)));
}

#[test]
fn track_single_key_is_constant() {
    let track = KeyframeTrack::new(vec![4.0], vec![Vec3::ONE]);

    assert_eq!(track.bracket(100.0), (0, 0));
    assert!(approx_vec3(track.sample(-3.0), Vec3::ONE));
    assert!(approx_vec3(track.sample(100.0), Vec3::ONE));
}

#[test]
fn track_coincident_keys_never_produce_nan() {
    let track = KeyframeTrack::new(vec![1.0, 1.0], vec![Vec3::X, Vec3::Y]);

    let v = track.sample(1.0);
    assert!(v.is_finite());
    assert!(approx_vec3(v, Vec3::X));
}

// ============================================================================
// KeyframeTrack: Quat
// ============================================================================

#[test]
fn track_quat_quarter_turn_midpoint() {
    let track = KeyframeTrack::new(
        vec![0.0, 10.0],
        vec![Quat::IDENTITY, Quat::from_rotation_y(FRAC_PI_2)],
    );

    let q = track.sample(5.0);
    assert!(same_rotation(q, Quat::from_rotation_y(FRAC_PI_2 / 2.0)));
    assert!(approx(q.length(), 1.0));
}

#[test]
fn track_quat_exact_keys() {
    let end = Quat::from_rotation_x(1.0);
    let track = KeyframeTrack::new(vec![0.0, 2.0], vec![Quat::IDENTITY, end]);

    assert!(same_rotation(track.sample(0.0), Quat::IDENTITY));
    assert!(same_rotation(track.sample(2.0), end));
}

// ============================================================================
// Slerp
// ============================================================================

#[test]
fn slerp_identical_returns_first() {
    let q = Quat::from_rotation_z(0.7);
    assert_eq!(slerp(q, q, 0.3), q);
}

#[test]
fn slerp_antipodal_returns_first() {
    // q and -q encode the same rotation, |cos| = 1
    let q = Quat::from_rotation_y(0.5);
    assert!(same_rotation(slerp(q, -q, 0.5), q));
}

#[test]
fn slerp_takes_short_arc() {
    let a = Quat::from_rotation_x(0.1);
    let b = -Quat::from_rotation_x(0.5);

    let mid = slerp(a, b, 0.5);
    assert!(same_rotation(mid, Quat::from_rotation_x(0.3)));
}

#[test]
fn slerp_endpoints() {
    let a = Quat::from_rotation_z(0.2);
    let b = Quat::from_rotation_z(1.4);

    assert!(same_rotation(slerp(a, b, 0.0), a));
    assert!(same_rotation(slerp(a, b, 1.0), b));
}

#[test]
fn slerp_nearly_parallel_is_componentwise_lerp() {
    let a = Quat::IDENTITY;
    let b = Quat::from_rotation_y(0.0016);

    let q = slerp(a, b, 0.25);
    let expected = Vec4::from(a).lerp(Vec4::from(b), 0.25);
    assert!(Vec4::from(q).abs_diff_eq(expected, 1e-6));
}

// ============================================================================
// NodeTracks
// ============================================================================

#[test]
fn node_tracks_absent_channels_are_none() {
    let channel = RawChannel {
        node_name: "Hip".into(),
        rotation_keys: vec![(0.0, Quat::IDENTITY)],
        ..Default::default()
    };

    let tracks = NodeTracks::from_raw(&channel).unwrap();
    assert!(tracks.position.is_none());
    assert!(tracks.scale.is_none());
    assert_eq!(tracks.rotation.as_ref().map(KeyframeTrack::len), Some(1));
}

#[test]
fn node_tracks_reject_decreasing_times() {
    let channel = RawChannel {
        node_name: "Hip".into(),
        position_keys: vec![(0.0, Vec3::ZERO), (2.0, Vec3::X), (1.0, Vec3::Y)],
        ..Default::default()
    };

    let err = NodeTracks::from_raw(&channel).unwrap_err();
    assert!(matches!(
        err,
        TendonError::InvalidTrack { ref node, channel: "position", .. } if node == "Hip"
    ));
}

#[test]
fn node_tracks_end_time_spans_all_tracks() {
    let channel = RawChannel {
        node_name: "Hip".into(),
        position_keys: vec![(0.0, Vec3::ZERO), (3.0, Vec3::X)],
        scale_keys: vec![(0.0, Vec3::ONE), (8.0, Vec3::ONE)],
        ..Default::default()
    };

    assert!(approx(NodeTracks::from_raw(&channel).unwrap().end_time(), 8.0));
}

// ============================================================================
// AnimationPlayer
// ============================================================================

#[test]
fn player_advances_in_ticks() {
    let clip = AnimationClip::new("walk", 100.0, 25.0);
    let mut player = AnimationPlayer::new();

    player.advance(0.5, &clip);
    assert!(approx(player.time(), 12.5));
}

#[test]
fn player_wraps_by_subtracting_duration() {
    let clip = AnimationClip::new("walk", 4.0, 10.0);
    let mut player = AnimationPlayer::new();

    player.advance(0.3, &clip);
    player.advance(0.2, &clip);
    assert!(approx(player.time(), 1.0));
}

#[test]
fn player_wraps_large_steps() {
    let clip = AnimationClip::new("walk", 4.0, 10.0);
    let mut player = AnimationPlayer::new();

    player.advance(3.3, &clip);
    assert!(player.time() >= 0.0 && player.time() < 4.0);
    assert!(approx(player.time(), 1.0));
}

#[test]
fn player_paused_and_speed() {
    let clip = AnimationClip::new("walk", 100.0, 10.0);
    let mut player = AnimationPlayer::new();

    player.paused = true;
    player.advance(1.0, &clip);
    assert!(approx(player.time(), 0.0));

    player.paused = false;
    player.set_speed(2.0);
    player.advance(1.0, &clip);
    assert!(approx(player.time(), 20.0));

    player.set_speed(-1.0);
    assert!(approx(player.speed(), 0.0));
}

#[test]
fn player_seek_wraps() {
    let clip = AnimationClip::new("walk", 10.0, 1.0);
    let mut player = AnimationPlayer::new();

    player.seek(13.0, &clip);
    assert!(approx(player.time(), 3.0));
}

#[test]
fn wrap_time_is_idempotent() {
    let duration = 2.5;
    for i in 0..40 {
        let time = i as f32 * 0.37;
        let once = wrap_time(time, duration);
        assert!((0.0..duration).contains(&once), "{once} from {time}");
        assert!(approx(wrap_time(once, duration), once));
    }
}

#[test]
fn wrap_time_edges() {
    assert!(approx(wrap_time(1.0, 2.0), 1.0));
    assert!(approx(wrap_time(2.0, 2.0), 0.0));
    assert!(approx(wrap_time(5.0, 0.0), 0.0));
}

#[test]
fn clip_duration_in_seconds() {
    let clip = AnimationClip::new("idle", 50.0, 25.0);
    assert!(approx(clip.duration_seconds(), 2.0));
    assert!(approx(AnimationClip::new("still", 50.0, 0.0).duration_seconds(), 0.0));
}
