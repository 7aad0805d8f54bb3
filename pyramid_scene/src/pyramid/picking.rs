//! Pointer picking for blocks and icons.
//!
//! Uses manual ray intersection instead of Bevy's mesh picking to avoid
//! input absorption conflicts with bevy_egui. Hit volumes are tested as
//! tapered blocks by moving the ray into their local space.

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::CursorIcon;
use bevy_egui::EguiContexts;

use super::state::PyramidState;
use super::{HitVolume, SectionIcon};
use crate::data::Sections;
use crate::navigation::NavigationRequested;
use crate::scene::SceneCamera;

/// Picking radius of an icon relative to its scale.
const ICON_PICK_RADIUS: f32 = 0.5;

/// Cursor ray for the current frame. `None` when the pointer is outside the
/// window or over an egui area.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct PointerRay(pub Option<Ray3d>);

pub(crate) fn update_pointer_ray(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<SceneCamera>>,
    mut contexts: EguiContexts,
    mut pointer: ResMut<PointerRay>,
) {
    let over_ui = contexts.ctx_mut().is_pointer_over_area();
    pointer.0 = if over_ui {
        None
    } else {
        cursor_ray(&windows, &cameras)
    };
}

fn cursor_ray(
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&Camera, &GlobalTransform), With<SceneCamera>>,
) -> Option<Ray3d> {
    let window = windows.get_single().ok()?;
    let cursor = window.cursor_position()?;
    let (camera, transform) = cameras.get_single().ok()?;
    camera.viewport_to_world(transform, cursor).ok()
}

pub(crate) fn hover_raycast_system(
    time: Res<Time>,
    pointer: Res<PointerRay>,
    volumes: Query<(&HitVolume, &GlobalTransform)>,
    mut state: ResMut<PyramidState>,
) {
    let target = pointer.0.and_then(|ray| pick_block(ray, &volumes));
    state.pointer_at(target, time.elapsed());
}

pub(crate) fn icon_hover_cursor_system(
    mut commands: Commands,
    window_entities: Query<Entity, With<PrimaryWindow>>,
    pointer: Res<PointerRay>,
    icons: Query<(&SectionIcon, &GlobalTransform)>,
    mut pointing: Local<bool>,
) {
    let over_icon = pointer
        .0
        .and_then(|ray| pick_icon(ray, &icons))
        .is_some();
    if over_icon == *pointing {
        return;
    }
    *pointing = over_icon;

    let Ok(window) = window_entities.get_single() else {
        return;
    };
    let icon = if over_icon {
        SystemCursorIcon::Pointer
    } else {
        SystemCursorIcon::Default
    };
    commands.entity(window).insert(CursorIcon::System(icon));
}

/// Left click on an icon asks to open the link of the section it shows.
pub fn icon_click_system(
    mouse: Res<ButtonInput<MouseButton>>,
    pointer: Res<PointerRay>,
    icons: Query<(&SectionIcon, &GlobalTransform)>,
    sections: Res<Sections>,
    mut navigation: EventWriter<NavigationRequested>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(block) = pointer.0.and_then(|ray| pick_icon(ray, &icons)) else {
        return;
    };
    let Some(link) = sections.link_for_block(block) else {
        return;
    };
    info!("icon on block {block} clicked, opening {link}");
    navigation.send(NavigationRequested { url: link.clone() });
}

/// Nearest block whose hit volume the ray passes through.
pub fn pick_block<'a>(
    ray: Ray3d,
    volumes: impl IntoIterator<Item = (&'a HitVolume, &'a GlobalTransform)>,
) -> Option<usize> {
    volumes
        .into_iter()
        .filter_map(|(volume, transform)| {
            let inverse = transform.affine().inverse();
            let origin = inverse.transform_point3(ray.origin);
            let direction = inverse.transform_vector3(*ray.direction);
            ray_convex_intersect(origin, direction, &volume.shape.planes())
                .map(|t| (volume.block, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(block, _)| block)
}

/// Nearest icon the ray passes through, by block index.
pub fn pick_icon<'a>(
    ray: Ray3d,
    icons: impl IntoIterator<Item = (&'a SectionIcon, &'a GlobalTransform)>,
) -> Option<usize> {
    icons
        .into_iter()
        .filter_map(|(icon, transform)| {
            let (scale, _, center) = transform.to_scale_rotation_translation();
            let radius = scale.x.abs() * ICON_PICK_RADIUS;
            ray_sphere_intersect(ray.origin, *ray.direction, center, radius)
                .map(|t| (icon.block, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(block, _)| block)
}

/// Ray against a convex volume given as `(outward normal, offset)` planes.
/// Returns the entry distance, or zero when the origin is already inside.
pub fn ray_convex_intersect(origin: Vec3, dir: Vec3, planes: &[(Vec3, f32)]) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    for (normal, offset) in planes {
        let facing = normal.dot(dir);
        let distance = offset - normal.dot(origin);
        if facing.abs() < f32::EPSILON {
            if distance < 0.0 {
                return None;
            }
            continue;
        }
        let t = distance / facing;
        if facing < 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_exit = t_exit.min(t);
        }
    }
    if t_enter <= t_exit && t_exit > 0.0 {
        Some(t_enter.max(0.0))
    } else {
        None
    }
}

/// `dir` must be normalized.
pub fn ray_sphere_intersect(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let along = to_center.dot(dir);
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - closest_sq).sqrt();
    let t_exit = along + half_chord;
    if t_exit < 0.0 {
        return None;
    }
    Some((along - half_chord).max(0.0))
}
