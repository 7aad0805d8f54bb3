mod overlay;
mod status;

pub use overlay::{overlay_plugin, HeadlineAnimator, LinksPanel};
pub use status::status_plugin;
