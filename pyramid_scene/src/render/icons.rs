//! Generated stand-in for section icons that failed to load.

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

pub const FALLBACK_ICON_SIZE: u32 = 64;

/// A white ring with `index + 1` dots inside, so the four glyphs stay
/// distinguishable.
pub fn fallback_icon_image(index: usize) -> Image {
    let size = FALLBACK_ICON_SIZE;
    let mut image = Image::new_fill(
        Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    );

    let center = Vec2::splat(size as f32 / 2.0);
    let outer = size as f32 * 0.46;
    let inner = size as f32 * 0.38;
    let dots = index + 1;
    let dot_radius = size as f32 * 0.05;
    let dot_centers: Vec<Vec2> = (0..dots)
        .map(|i| {
            let x = (i as f32 + 0.5) / dots as f32 - 0.5;
            center + Vec2::new(x * size as f32 * 0.5, 0.0)
        })
        .collect();

    for y in 0..size {
        for x in 0..size {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let r = p.distance(center);
            let on_ring = r <= outer && r >= inner;
            let on_dot = dot_centers.iter().any(|c| p.distance(*c) <= dot_radius);
            if on_ring || on_dot {
                let offset = ((y * size + x) * 4) as usize;
                image.data[offset..offset + 4].copy_from_slice(&[255, 255, 255, 255]);
            }
        }
    }
    image
}
