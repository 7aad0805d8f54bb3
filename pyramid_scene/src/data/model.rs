//! Section descriptors and the farm JSON document they arrive in.
//!
//! Validation happens when a document is turned into the `Sections` resource.

use bevy::prelude::*;
use serde::Deserialize;
use url::Url;

use crate::error::SiteConfigError;

/// Number of product sections, one per pyramid block.
pub const SECTION_COUNT: usize = 4;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SectionLink {
    pub label: String,
    pub href: Url,
}

/// One product area: headline, copy, icon and the page it links to.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SectionDescriptor {
    pub name: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub link: Url,
    #[serde(default)]
    pub links: Vec<SectionLink>,
}

impl SectionDescriptor {
    /// Icon path relative to the asset root. Web-root style `/icon.png` paths
    /// are accepted; `None` when the icon is missing or blank.
    pub fn icon_asset_path(&self) -> Option<String> {
        let path = self.icon.as_deref()?.trim().trim_start_matches('/');
        (!path.is_empty()).then(|| path.to_string())
    }
}

/// Per-farm site document, served as `farms/{id}.json`.
#[derive(Asset, TypePath, Clone, Debug, Deserialize)]
pub struct FarmConfig {
    pub name: String,
    pub link: Url,
    pub sections: Vec<SectionDescriptor>,
}

impl FarmConfig {
    pub fn from_json(json: &str) -> Result<Self, SiteConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// How the descriptor list lines up with blocks (indexed bottom to top).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SectionMapping {
    /// Descriptors are listed from the apex down: block `i` shows descriptor `3 - i`.
    #[default]
    TopDown,
    /// Descriptors are listed from the base up: block `i` shows descriptor `i`.
    BottomUp,
}

impl SectionMapping {
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "top-down" | "topdown" => Some(Self::TopDown),
            "bottom-up" | "bottomup" => Some(Self::BottomUp),
            _ => None,
        }
    }

    pub fn section_for_block(self, block: usize) -> usize {
        match self {
            Self::TopDown => SECTION_COUNT - 1 - block.min(SECTION_COUNT - 1),
            Self::BottomUp => block,
        }
    }

    /// Inverse of [`Self::section_for_block`]; both mappings are involutions.
    pub fn block_for_section(self, section: usize) -> usize {
        self.section_for_block(section)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FarmIdentity {
    pub name: String,
    pub link: Url,
}

/// The validated section list the pyramid and overlay render from.
#[derive(Resource, Clone, Debug)]
pub struct Sections {
    pub farm: Option<FarmIdentity>,
    pub descriptors: [SectionDescriptor; SECTION_COUNT],
    pub mapping: SectionMapping,
}

impl Sections {
    pub fn from_descriptors(
        descriptors: Vec<SectionDescriptor>,
        mapping: SectionMapping,
    ) -> Result<Self, SiteConfigError> {
        let found = descriptors.len();
        let descriptors = <[SectionDescriptor; SECTION_COUNT]>::try_from(descriptors).map_err(
            |_| SiteConfigError::SectionCount {
                expected: SECTION_COUNT,
                found,
            },
        )?;
        Ok(Self {
            farm: None,
            descriptors,
            mapping,
        })
    }

    pub fn from_farm(config: FarmConfig, mapping: SectionMapping) -> Result<Self, SiteConfigError> {
        let mut sections = Self::from_descriptors(config.sections, mapping)?;
        sections.farm = Some(FarmIdentity {
            name: config.name,
            link: config.link,
        });
        Ok(sections)
    }

    pub fn section_index(&self, block: usize) -> usize {
        self.mapping.section_for_block(block)
    }

    pub fn for_block(&self, block: usize) -> Option<&SectionDescriptor> {
        if block >= SECTION_COUNT {
            return None;
        }
        self.descriptors.get(self.section_index(block))
    }

    pub fn link_for_block(&self, block: usize) -> Option<&Url> {
        self.for_block(block).map(|section| &section.link)
    }
}

/// Built-in section list used when no farm is selected, ordered apex first.
pub fn default_sections() -> Vec<SectionDescriptor> {
    const DEFAULTS: [(&str, &str, &str, &str); SECTION_COUNT] = [
        (
            "Finances",
            "Costs, subsidies and margins per field and season, reconciled with bookkeeping.",
            "icons/euro.png",
            "https://fmis.example.com/finances",
        ),
        (
            "Product",
            "Harvest volumes, quality grades and stock from the field to the buyer.",
            "icons/package.png",
            "https://fmis.example.com/product",
        ),
        (
            "Internal Processes",
            "Work orders, machine hours and compliance records for daily operations.",
            "icons/gear.png",
            "https://fmis.example.com/processes",
        ),
        (
            "Resources",
            "Staff, machinery, land and inputs planned against the crop calendar.",
            "icons/group.png",
            "https://fmis.example.com/resources",
        ),
    ];

    DEFAULTS
        .iter()
        .filter_map(|&(name, description, icon, link)| {
            Some(SectionDescriptor {
                name: name.to_string(),
                description: description.to_string(),
                icon: Some(icon.to_string()),
                link: Url::parse(link).ok()?,
                links: Vec::new(),
            })
        })
        .collect()
}
