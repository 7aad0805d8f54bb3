//! Per-frame systems: advance the state once, then mirror it onto entities.

use bevy::color::Alpha;
use bevy::prelude::*;

use super::state::PyramidState;
use super::{BlockEdges, PyramidAssembly, PyramidBlock, SectionChanged, SectionIcon};
use crate::data::Sections;
use crate::render::BlockGlowMaterial;
use crate::scene::SceneCamera;

const EDGE_COLOR: Color = Color::srgb(0.125, 0.5, 1.0);
const GRID_COLOR: Color = Color::srgb(0.35, 0.55, 0.7);
const GRID_HALF_EXTENT: f32 = 6.0;
const GRID_SPACING: f32 = 0.5;

/// Host callback for section changes, invoked from [`SectionChanged`] events.
#[derive(Resource)]
pub struct SectionCallback(pub Box<dyn Fn(SectionChanged) + Send + Sync>);

pub fn advance_pyramid(
    time: Res<Time>,
    mut state: ResMut<PyramidState>,
    sections: Option<Res<Sections>>,
    mut changes: EventWriter<SectionChanged>,
) {
    let Some(block) = state.step(time.delta_secs(), time.elapsed()) else {
        return;
    };
    let section = block.and_then(|b| sections.as_ref().map(|s| s.section_index(b)));
    debug!("hovered block changed to {block:?} (section {section:?})");
    changes.send(SectionChanged { block, section });
}

pub fn invoke_section_callback(
    mut changes: EventReader<SectionChanged>,
    callback: Option<Res<SectionCallback>>,
) {
    let Some(callback) = callback else {
        changes.clear();
        return;
    };
    for change in changes.read() {
        (callback.0)(*change);
    }
}

pub(crate) fn sync_assembly(
    state: Res<PyramidState>,
    mut assembly: Query<&mut Transform, With<PyramidAssembly>>,
) {
    for mut transform in &mut assembly {
        transform.rotation = Quat::from_rotation_y(state.rotation());
    }
}

pub(crate) fn sync_blocks(
    state: Res<PyramidState>,
    mut blocks: Query<(
        &PyramidBlock,
        &mut Transform,
        &MeshMaterial3d<BlockGlowMaterial>,
    )>,
    mut materials: ResMut<Assets<BlockGlowMaterial>>,
) {
    let accent = state.accent_color();
    for (block, mut transform, material) in &mut blocks {
        let anim = state.block(block.index);
        transform.translation.y = anim.offset();
        transform.rotation = Quat::from_rotation_y(anim.angle());
        if let Some(material) = materials.get_mut(&material.0) {
            material.set_frame(
                state.elapsed(),
                state.is_highlighted(block.index),
                anim.lift,
                accent,
            );
        }
    }
}

/// Scales and tints the icons, and turns them to face the camera.
#[allow(clippy::type_complexity)]
pub(crate) fn sync_icons(
    state: Res<PyramidState>,
    camera: Query<&Transform, With<SceneCamera>>,
    mut icons: Query<
        (&mut Transform, &MeshMaterial3d<StandardMaterial>),
        (With<SectionIcon>, Without<SceneCamera>),
    >,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let camera_position = camera.get_single().ok().map(|tf| tf.translation);
    let scale = Vec3::splat(state.icon_scale());
    let tint = state.icon_tint();

    for (mut transform, material) in &mut icons {
        transform.scale = scale;
        if let Some(camera_position) = camera_position {
            let away = transform.translation - camera_position;
            transform.look_to(away, Vec3::Y);
        }
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = tint;
        }
    }
}

pub(crate) fn draw_block_edges(
    mut gizmos: Gizmos,
    state: Res<PyramidState>,
    blocks: Query<(&PyramidBlock, &BlockEdges, &GlobalTransform)>,
) {
    for (block, edges, transform) in &blocks {
        let alpha = if state.is_highlighted(block.index) {
            0.45
        } else {
            0.18
        };
        let color = EDGE_COLOR.with_alpha(alpha);
        for (start, end) in &edges.0 {
            gizmos.line(
                transform.transform_point(*start),
                transform.transform_point(*end),
                color,
            );
        }
    }
}

/// Floor grid under the pyramid, spinning with it and fading outward.
pub(crate) fn draw_floor_grid(
    mut gizmos: Gizmos,
    assembly: Query<&GlobalTransform, With<PyramidAssembly>>,
) {
    let Ok(transform) = assembly.get_single() else {
        return;
    };
    let point = |x: f32, z: f32| transform.transform_point(Vec3::new(x, 0.0, z));
    let lines = (GRID_HALF_EXTENT / GRID_SPACING) as i32;
    for i in -lines..=lines {
        let offset = i as f32 * GRID_SPACING;
        let fade = 1.0 - offset.abs() / GRID_HALF_EXTENT;
        let color = GRID_COLOR.with_alpha(0.25 * fade);
        gizmos.line(
            point(offset, -GRID_HALF_EXTENT),
            point(offset, GRID_HALF_EXTENT),
            color,
        );
        gizmos.line(
            point(-GRID_HALF_EXTENT, offset),
            point(GRID_HALF_EXTENT, offset),
            color,
        );
    }
}
