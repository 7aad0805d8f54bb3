//! Custom materials and generated textures.

mod icons;
mod materials;

use bevy::prelude::*;

pub use icons::{fallback_icon_image, FALLBACK_ICON_SIZE};
pub use materials::{
    BlockGlowMaterial, BlockGlowUniform, CloudsMaterial, BLOCK_BASE_COLOR, BLOCK_HIGHLIGHT_COLOR,
};

pub fn render_plugin(app: &mut App) {
    app.add_plugins((
        MaterialPlugin::<BlockGlowMaterial>::default(),
        MaterialPlugin::<CloudsMaterial>::default(),
    ));
}
