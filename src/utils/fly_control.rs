use glam::{Mat4, Vec3};

/// Right stick values inside `[-ANALOG_DEADZONE, ANALOG_DEADZONE]` are ignored.
pub const ANALOG_DEADZONE: i16 = 8000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadButton {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    RightX,
    Other,
}

/// Raw input as delivered by the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key, repeat: bool },
    ButtonDown(PadButton),
    ButtonUp(PadButton),
    AxisMotion { axis: Axis, value: i16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Front,
    Back,
    Left,
    Right,
}

/// First-person camera that walks on the horizontal plane and turns around
/// the world up axis.
///
/// Events only latch the current movement and rotation direction; the
/// camera moves in [`update`](Self::update).
#[derive(Debug, Clone)]
pub struct FlyCamera {
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    /// Degrees; `-90` looks down `-Z`.
    pub yaw: f32,
    pub pitch: f32,
    /// World units per second.
    pub move_speed: f32,
    /// Degrees per second.
    pub rotate_speed: f32,

    moving: Option<Direction>,
    rotating: Option<Direction>,
}

impl FlyCamera {
    #[must_use]
    pub fn new(position: Vec3, move_speed: f32, rotate_speed: f32) -> Self {
        Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            move_speed,
            rotate_speed,
            moving: None,
            rotating: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn moving(&self) -> Option<Direction> {
        self.moving
    }

    #[inline]
    #[must_use]
    pub fn rotating(&self) -> Option<Direction> {
        self.rotating
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { repeat: true, .. } | InputEvent::KeyUp { repeat: true, .. } => {}
            InputEvent::KeyDown { key, .. } => match key {
                Key::W => self.moving = Some(Direction::Front),
                Key::S => self.moving = Some(Direction::Back),
                Key::A => self.moving = Some(Direction::Left),
                Key::D => self.moving = Some(Direction::Right),
                Key::Up => self.rotating = Some(Direction::Front),
                Key::Down => self.rotating = Some(Direction::Back),
                Key::Left => self.rotating = Some(Direction::Left),
                Key::Right => self.rotating = Some(Direction::Right),
                Key::Other => {}
            },
            InputEvent::KeyUp { key, .. } => match key {
                Key::W | Key::S | Key::A | Key::D => self.moving = None,
                Key::Up | Key::Down | Key::Left | Key::Right => self.rotating = None,
                Key::Other => {}
            },
            InputEvent::ButtonDown(button) => match button {
                PadButton::DPadUp => self.moving = Some(Direction::Front),
                PadButton::DPadDown => self.moving = Some(Direction::Back),
                PadButton::DPadLeft => self.moving = Some(Direction::Left),
                PadButton::DPadRight => self.moving = Some(Direction::Right),
                PadButton::Other => {}
            },
            InputEvent::ButtonUp(button) => {
                if button != PadButton::Other {
                    self.moving = None;
                }
            }
            InputEvent::AxisMotion {
                axis: Axis::RightX,
                value,
            } => {
                self.rotating = if value > ANALOG_DEADZONE {
                    Some(Direction::Right)
                } else if value < -ANALOG_DEADZONE {
                    Some(Direction::Left)
                } else {
                    None
                };
            }
            InputEvent::AxisMotion { .. } => {}
        }
    }

    /// Applies the latched rotation, then the latched movement, over `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        match self.rotating {
            Some(Direction::Left) => self.turn(-self.rotate_speed * dt),
            Some(Direction::Right) => self.turn(self.rotate_speed * dt),
            // Looking up and down is not supported
            Some(Direction::Front | Direction::Back) | None => {}
        }

        let step = self.move_speed * dt;
        match self.moving {
            Some(Direction::Front) => self.position += self.front * step,
            Some(Direction::Back) => self.position -= self.front * step,
            Some(Direction::Left) => self.position -= self.right() * step,
            Some(Direction::Right) => self.position += self.right() * step,
            None => {}
        }
    }

    fn turn(&mut self, degrees: f32) {
        self.yaw += degrees;
        let yaw = self.yaw.to_radians();
        self.front = Vec3::new(yaw.cos(), 0.0, yaw.sin()).normalize();
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Right-handed perspective projection with a `[0, 1]` depth range.
    #[must_use]
    pub fn projection(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(fov_degrees.to_radians(), aspect, near, far)
    }
}
