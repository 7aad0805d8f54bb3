//! Block glow and cloud background materials.

use bevy::color::ColorToComponents;
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::render_resource::{AsBindGroup, ShaderRef, ShaderType};

const BLOCK_GLOW_SHADER: &str = "shaders/block_glow.wgsl";
const CLOUDS_SHADER: &str = "shaders/clouds.wgsl";

/// Resting block surface colour (#0089CC).
pub const BLOCK_BASE_COLOR: Color = Color::srgb(0.0, 0.537, 0.8);
/// Highlighted block surface colour (#01B9F1).
pub const BLOCK_HIGHLIGHT_COLOR: Color = Color::srgb(0.004, 0.725, 0.945);

const RESTING_OPACITY: f32 = 0.4;

#[derive(ShaderType, Clone, Copy, Debug, Default)]
pub struct BlockGlowUniform {
    pub base_color: Vec4,
    pub accent_color: Vec4,
    /// x: elapsed seconds, y: highlighted (0/1), z: eased lift, w: resting opacity.
    pub params: Vec4,
}

/// Fresnel-lit block surface. Top and bottom faces are cut away while the
/// block rests and turn solid white once it is highlighted.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct BlockGlowMaterial {
    #[uniform(0)]
    pub uniforms: BlockGlowUniform,
}

impl Default for BlockGlowMaterial {
    fn default() -> Self {
        Self {
            uniforms: BlockGlowUniform {
                base_color: BLOCK_BASE_COLOR.to_linear().to_vec4(),
                accent_color: BLOCK_HIGHLIGHT_COLOR.to_linear().to_vec4(),
                params: Vec4::new(0.0, 0.0, 0.0, RESTING_OPACITY),
            },
        }
    }
}

impl BlockGlowMaterial {
    pub fn set_frame(&mut self, elapsed: f32, highlighted: bool, lift: f32, accent: Color) {
        self.uniforms.accent_color = accent.to_linear().to_vec4();
        self.uniforms.params.x = elapsed;
        self.uniforms.params.y = if highlighted { 1.0 } else { 0.0 };
        self.uniforms.params.z = lift;
    }
}

impl Material for BlockGlowMaterial {
    fn fragment_shader() -> ShaderRef {
        BLOCK_GLOW_SHADER.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }
}

/// Animated fbm cloud layer behind the pyramid.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone, Default)]
pub struct CloudsMaterial {
    /// x: elapsed seconds.
    #[uniform(0)]
    pub params: Vec4,
}

impl Material for CloudsMaterial {
    fn fragment_shader() -> ShaderRef {
        CLOUDS_SHADER.into()
    }
}
