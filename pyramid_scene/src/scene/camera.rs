//! Viewport-dependent camera framing and pointer parallax.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use crate::anim::{ease_toward, rate_for_factor};

/// Logical width below which the narrow (mobile) framing applies.
pub const NARROW_WIDTH: f32 = 768.0;
/// Aspect ratio above which the ultrawide framing applies.
pub const ULTRAWIDE_ASPECT: f32 = 3.0;

const CAMERA_HEIGHT: f32 = 0.5;
const PARALLAX_STRENGTH: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportClass {
    Default,
    Ultrawide,
    Narrow,
}

impl ViewportClass {
    pub fn classify(width: f32, height: f32) -> Self {
        if height > 0.0 && width / height > ULTRAWIDE_ASPECT {
            Self::Ultrawide
        } else if width < NARROW_WIDTH {
            Self::Narrow
        } else {
            Self::Default
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFraming {
    pub class: ViewportClass,
    pub fov_degrees: f32,
    pub distance: f32,
}

impl CameraFraming {
    pub fn for_viewport(width: f32, height: f32) -> Self {
        let class = ViewportClass::classify(width, height);
        let (fov_degrees, distance) = match class {
            ViewportClass::Default => (22.0, 10.0),
            ViewportClass::Ultrawide => (16.0, 12.0),
            ViewportClass::Narrow => (30.0, 12.0),
        };
        Self {
            class,
            fov_degrees,
            distance,
        }
    }
}

/// Camera placement state: framing for the current viewport plus the eased
/// parallax offset.
#[derive(Component, Clone, Debug)]
pub struct CameraRig {
    pub framing: CameraFraming,
    pub parallax: Vec2,
    pub parallax_rate: f32,
}

impl CameraRig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            framing: CameraFraming::for_viewport(width, height),
            parallax: Vec2::ZERO,
            parallax_rate: rate_for_factor(0.05, 60.0),
        }
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.parallax.x,
            CAMERA_HEIGHT + self.parallax.y,
            self.framing.distance,
        )
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(Vec3::ZERO, Vec3::Y)
    }
}

/// Cursor position mapped to `[-1, 1]` on both axes, y up.
pub fn pointer_offset(cursor: Vec2, size: Vec2) -> Vec2 {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec2::ZERO;
    }
    let normalized = cursor / size * 2.0 - Vec2::ONE;
    Vec2::new(normalized.x, -normalized.y).clamp(Vec2::NEG_ONE, Vec2::ONE)
}

/// Re-derives field of view and distance. Touches nothing but the camera.
pub fn reframe_on_resize(
    mut resized: EventReader<WindowResized>,
    mut rigs: Query<(&mut CameraRig, &mut Projection, &mut Transform)>,
) {
    let Some(last) = resized.read().last() else {
        return;
    };
    let framing = CameraFraming::for_viewport(last.width, last.height);
    for (mut rig, mut projection, mut transform) in &mut rigs {
        if rig.framing.class != framing.class {
            info!(
                "viewport {}x{} reframed as {:?}",
                last.width, last.height, framing.class
            );
        }
        rig.framing = framing;
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.fov = framing.fov_degrees.to_radians();
        }
        *transform = rig.transform();
    }
}

pub fn parallax_plugin(app: &mut App) {
    app.add_systems(Update, camera_parallax_system.after(reframe_on_resize));
}

fn camera_parallax_system(
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut rigs: Query<(&mut CameraRig, &mut Transform)>,
) {
    let target = windows
        .get_single()
        .ok()
        .and_then(|window| {
            let size = Vec2::new(window.width(), window.height());
            window
                .cursor_position()
                .map(|cursor| pointer_offset(cursor, size))
        })
        .unwrap_or(Vec2::ZERO)
        * PARALLAX_STRENGTH;

    let dt = time.delta_secs();
    for (mut rig, mut transform) in &mut rigs {
        let rate = rig.parallax_rate;
        rig.parallax = Vec2::new(
            ease_toward(rig.parallax.x, target.x, rate, dt),
            ease_toward(rig.parallax.y, target.y, rate, dt),
        );
        *transform = rig.transform();
    }
}
