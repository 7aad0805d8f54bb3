mod loader;
mod model;

pub use loader::{farm_config_path, loader_plugin, SectionIcons, SiteLoader, SiteState};
pub use model::{
    default_sections, FarmConfig, FarmIdentity, SectionDescriptor, SectionLink, SectionMapping,
    Sections, SECTION_COUNT,
};
