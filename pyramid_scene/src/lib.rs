//! Pyramind: a rotating four-block pyramid whose blocks stand for the
//! product sections of a farm management information system.
//!
//! Library root: core state, scene plugins, SDK builder and config.

pub mod anim;
pub mod config;
pub mod data;
pub mod error;
pub mod navigation;
pub mod pyramid;
pub mod render;
pub mod scene;
mod ui;

pub mod prelude;
pub mod sdk;

pub use data::{SectionDescriptor, SectionMapping, Sections, SiteState};
pub use pyramid::{PyramidState, PyramidTuning, SectionChanged};
pub use ui::{HeadlineAnimator, LinksPanel};
