//! Pyramind: the farm management information system landing scene.

use bevy::prelude::*;
use pyramid_scene::prelude::*;

fn main() -> AppExit {
    let _ = dotenvy::dotenv();
    PyramindBuilder::new().site_settings().build().run()
}
