//! The section pyramid: four stacked blocks that open up to the hovered one.

mod geometry;
mod picking;
mod spawn;
mod state;
mod systems;

use bevy::prelude::*;

use crate::data::SiteState;

pub use geometry::{half_width_at, BlockShape, BLOCK_HEIGHT, PYRAMID_HEIGHT};
pub use picking::{
    icon_click_system, pick_block, pick_icon, ray_convex_intersect, ray_sphere_intersect,
    PointerRay,
};
pub use spawn::{spawn_pyramid, ASSEMBLY_ORIGIN};
pub use state::{
    block_is_lifted, lift_target, BlockAnim, HoverInput, PyramidState, PyramidTuning, BLOCK_COUNT,
    FIXED_TILT, ICON_BASE_SCALE, ICON_HOVER_SCALE, LIFT_AMOUNT,
};
pub use systems::{advance_pyramid, invoke_section_callback, SectionCallback};

/// Root of the rotating assembly. Hit volumes and blocks are its children.
#[derive(Component)]
pub struct PyramidAssembly;

/// Visible, animated block mesh.
#[derive(Component, Debug)]
pub struct PyramidBlock {
    pub index: usize,
}

/// Invisible pointer target for one block. Stays at rest while the visible
/// block lifts, so the hovered stack does not run away from the pointer.
#[derive(Component, Debug, Clone, Copy)]
pub struct HitVolume {
    pub block: usize,
    pub shape: BlockShape,
}

/// Outline segments of a block, drawn as a faint wireframe.
#[derive(Component, Debug, Clone)]
pub struct BlockEdges(pub Vec<(Vec3, Vec3)>);

/// Camera-facing icon sprite for the section shown on `block`.
#[derive(Component, Debug)]
pub struct SectionIcon {
    pub block: usize,
}

/// Sent once whenever the hovered block changes, including back to none.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionChanged {
    pub block: Option<usize>,
    /// Index into `Sections::descriptors` for `block`.
    pub section: Option<usize>,
}

pub fn pyramid_plugin(app: &mut App) {
    app.init_resource::<PyramidState>()
        .init_resource::<PointerRay>()
        .add_event::<SectionChanged>()
        .add_systems(OnEnter(SiteState::Ready), spawn_pyramid)
        .add_systems(
            Update,
            (
                picking::update_pointer_ray,
                picking::hover_raycast_system,
                advance_pyramid,
                invoke_section_callback,
                (
                    systems::sync_assembly,
                    systems::sync_blocks,
                    systems::sync_icons,
                    picking::icon_hover_cursor_system,
                    icon_click_system,
                    systems::draw_block_edges,
                    systems::draw_floor_grid,
                ),
            )
                .chain()
                .run_if(in_state(SiteState::Ready)),
        );
}
