mod camera;
mod setup;

pub use camera::{
    parallax_plugin, pointer_offset, reframe_on_resize, CameraFraming, CameraRig, ViewportClass,
    NARROW_WIDTH, ULTRAWIDE_ASPECT,
};
pub use setup::{scene_plugin, setup_scene, Background, CloudLayer, SceneCamera};
