//! Minimal prelude for SDK consumers.

pub use crate::config::{site_settings, SiteSettings};
pub use crate::data::{default_sections, SectionDescriptor, SectionLink, SectionMapping};
pub use crate::navigation::NavigationRequested;
pub use crate::pyramid::{PyramidTuning, SectionChanged};
pub use crate::scene::Background;
pub use crate::sdk::PyramindBuilder;
