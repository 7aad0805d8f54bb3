use bevy::prelude::*;

use super::geometry::BlockShape;
use super::state::{PyramidState, BLOCK_COUNT, ICON_BASE_SCALE};
use super::{BlockEdges, HitVolume, PyramidAssembly, PyramidBlock, SectionIcon};
use crate::data::{SectionIcons, Sections, SiteState};
use crate::render::BlockGlowMaterial;

/// Assembly origin: the pyramid centred on the world origin, nudged down.
pub const ASSEMBLY_ORIGIN: Vec3 = Vec3::new(0.0, -1.25, 0.0);

/// Spawns the assembly, its blocks and the icon sprites. Everything is scoped
/// to [`SiteState::Ready`] and goes away with it.
pub fn spawn_pyramid(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut glow_materials: ResMut<Assets<BlockGlowMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    sections: Res<Sections>,
    icons: Res<SectionIcons>,
    mut state: ResMut<PyramidState>,
) {
    *state = PyramidState::new(state.tuning.clone());

    commands
        .spawn((
            PyramidAssembly,
            Transform::from_translation(ASSEMBLY_ORIGIN),
            Visibility::Visible,
            StateScoped(SiteState::Ready),
        ))
        .with_children(|assembly| {
            for index in 0..BLOCK_COUNT {
                let shape = BlockShape::new(index);
                assembly.spawn((
                    HitVolume {
                        block: index,
                        shape,
                    },
                    Transform::IDENTITY,
                ));
                assembly.spawn((
                    PyramidBlock { index },
                    Mesh3d(meshes.add(shape.mesh())),
                    MeshMaterial3d(glow_materials.add(BlockGlowMaterial::default())),
                    BlockEdges(shape.edges()),
                    Transform::IDENTITY,
                ));
            }
        });

    let quad = meshes.add(Rectangle::new(1.0, 1.0));
    for block in 0..BLOCK_COUNT {
        let section = sections.section_index(block);
        let material = materials.add(StandardMaterial {
            base_color_texture: Some(icons.handles[section].clone()),
            unlit: true,
            alpha_mode: AlphaMode::Blend,
            ..default()
        });
        let position = ASSEMBLY_ORIGIN + Vec3::Y * BlockShape::new(block).mid_height();
        commands.spawn((
            SectionIcon { block },
            Mesh3d(quad.clone()),
            MeshMaterial3d(material),
            Transform::from_translation(position).with_scale(Vec3::splat(ICON_BASE_SCALE)),
            StateScoped(SiteState::Ready),
        ));
    }

    info!("spawned pyramid with {BLOCK_COUNT} blocks");
}
