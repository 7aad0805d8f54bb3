//! Loading phase: farm config (optional) then icon textures, bounded by a timeout.
//!
//! Config failures end in [`SiteState::NotFound`]. Icon failures degrade to a
//! generated glyph so the pyramid still renders.

use std::time::Duration;

use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::data::model::{
    default_sections, FarmConfig, SectionDescriptor, SectionMapping, Sections, SECTION_COUNT,
};
use crate::error::SiteConfigError;
use crate::render::fallback_icon_image;

#[derive(States, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SiteState {
    #[default]
    Loading,
    Ready,
    NotFound,
}

/// Where the section list comes from, plus bookkeeping for the loading phase.
#[derive(Resource)]
pub struct SiteLoader {
    pub farm_id: Option<String>,
    pub preset: Option<Vec<SectionDescriptor>>,
    pub mapping: SectionMapping,
    pub timeout: Duration,
    farm: Option<(String, Handle<FarmConfig>)>,
    icons: Vec<Option<Handle<Image>>>,
    started: Duration,
    failure: Option<String>,
}

impl SiteLoader {
    pub fn new(farm_id: Option<String>, mapping: SectionMapping, timeout: Duration) -> Self {
        Self {
            farm_id,
            preset: None,
            mapping,
            timeout,
            farm: None,
            icons: Vec::new(),
            started: Duration::ZERO,
            failure: None,
        }
    }

    pub fn with_preset(mut self, sections: Vec<SectionDescriptor>) -> Self {
        self.preset = Some(sections);
        self
    }

    /// Reason shown on the not-found screen.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    fn timed_out(&self, now: Duration) -> bool {
        now.saturating_sub(self.started) >= self.timeout
    }
}

/// Icon textures indexed like `Sections::descriptors`.
#[derive(Resource, Clone, Debug)]
pub struct SectionIcons {
    pub handles: [Handle<Image>; SECTION_COUNT],
    pub fallback: [bool; SECTION_COUNT],
}

/// Asset path of a farm document. Ids are restricted to a safe character set
/// since they come from outside.
pub fn farm_config_path(farm_id: &str) -> Option<String> {
    let id = farm_id.trim();
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    valid.then(|| format!("farms/{id}.json"))
}

pub fn loader_plugin(app: &mut App) {
    app.add_plugins(JsonAssetPlugin::<FarmConfig>::new(&["json"]))
        .init_state::<SiteState>()
        .enable_state_scoped_entities::<SiteState>()
        .add_systems(OnEnter(SiteState::Loading), begin_loading)
        .add_systems(
            Update,
            (
                poll_farm_config.run_if(not(resource_exists::<Sections>)),
                poll_icons.run_if(resource_exists::<Sections>),
            )
                .chain()
                .run_if(in_state(SiteState::Loading)),
        )
        .add_systems(OnEnter(SiteState::Ready), log_ready)
        .add_systems(OnEnter(SiteState::NotFound), log_not_found);
}

fn begin_loading(
    mut commands: Commands,
    mut loader: ResMut<SiteLoader>,
    asset_server: Res<AssetServer>,
    time: Res<Time>,
    mut next_state: ResMut<NextState<SiteState>>,
) {
    loader.started = time.elapsed();
    loader.failure = None;

    if let Some(farm_id) = loader.farm_id.clone() {
        let Some(path) = farm_config_path(&farm_id) else {
            fail(
                &mut loader,
                &mut next_state,
                SiteConfigError::Load {
                    path: farm_id,
                    reason: "farm id contains unsupported characters".into(),
                },
            );
            return;
        };
        info!("loading farm config {path}");
        let handle = asset_server.load(path.clone());
        loader.farm = Some((path, handle));
        return;
    }

    let descriptors = loader.preset.clone().unwrap_or_else(default_sections);
    match Sections::from_descriptors(descriptors, loader.mapping) {
        Ok(sections) => {
            request_icons(&mut loader, &sections, &asset_server);
            commands.insert_resource(sections);
        }
        Err(err) => fail(&mut loader, &mut next_state, err),
    }
}

fn poll_farm_config(
    mut commands: Commands,
    mut loader: ResMut<SiteLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<FarmConfig>>,
    time: Res<Time>,
    mut next_state: ResMut<NextState<SiteState>>,
) {
    let Some((path, handle)) = loader.farm.clone() else {
        return;
    };

    if let Some(config) = configs.get(&handle) {
        match Sections::from_farm(config.clone(), loader.mapping) {
            Ok(sections) => {
                info!("farm config {path} loaded for {}", config.name);
                request_icons(&mut loader, &sections, &asset_server);
                commands.insert_resource(sections);
            }
            Err(err) => fail(&mut loader, &mut next_state, err),
        }
        return;
    }

    // Past the deadline an unresolved document is a timeout, whatever its load state.
    if loader.timed_out(time.elapsed()) {
        let timeout = loader.timeout;
        fail(
            &mut loader,
            &mut next_state,
            SiteConfigError::Timeout { path, timeout },
        );
        return;
    }

    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle.id()) {
        let reason = err.to_string();
        fail(
            &mut loader,
            &mut next_state,
            SiteConfigError::Load { path, reason },
        );
    }
}

fn request_icons(loader: &mut SiteLoader, sections: &Sections, asset_server: &AssetServer) {
    loader.icons = sections
        .descriptors
        .iter()
        .map(|section| match section.icon_asset_path() {
            Some(path) => Some(asset_server.load(path)),
            None => {
                warn!("section {:?} has no icon, using a generated glyph", section.name);
                None
            }
        })
        .collect();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum IconStatus {
    Pending,
    Loaded,
    Failed,
}

/// Icons are settled once none is pending, or unconditionally after the timeout.
pub(crate) fn icons_settled(statuses: &[IconStatus], timed_out: bool) -> bool {
    timed_out || statuses.iter().all(|s| *s != IconStatus::Pending)
}

fn poll_icons(
    mut commands: Commands,
    loader: Res<SiteLoader>,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    time: Res<Time>,
    mut next_state: ResMut<NextState<SiteState>>,
) {
    let statuses: Vec<IconStatus> = loader
        .icons
        .iter()
        .map(|handle| match handle {
            None => IconStatus::Failed,
            Some(handle) if asset_server.is_loaded_with_dependencies(handle.id()) => {
                IconStatus::Loaded
            }
            Some(handle) => match asset_server.get_load_state(handle.id()) {
                Some(LoadState::Failed(err)) => {
                    warn!("icon failed to load, using a generated glyph: {err}");
                    IconStatus::Failed
                }
                _ => IconStatus::Pending,
            },
        })
        .collect();

    let timed_out = loader.timed_out(time.elapsed());
    if !icons_settled(&statuses, timed_out) {
        return;
    }
    if timed_out && statuses.contains(&IconStatus::Pending) {
        warn!(
            "icons still pending after {:?}, using generated glyphs",
            loader.timeout
        );
    }

    let mut fallback = [false; SECTION_COUNT];
    let handles: [Handle<Image>; SECTION_COUNT] = std::array::from_fn(|index| {
        match (statuses.get(index), loader.icons.get(index)) {
            (Some(IconStatus::Loaded), Some(Some(handle))) => handle.clone(),
            _ => {
                fallback[index] = true;
                images.add(fallback_icon_image(index))
            }
        }
    });

    commands.insert_resource(SectionIcons { handles, fallback });
    next_state.set(SiteState::Ready);
}

fn fail(loader: &mut SiteLoader, next_state: &mut NextState<SiteState>, err: SiteConfigError) {
    error!("{err}");
    loader.failure = Some(err.to_string());
    next_state.set(SiteState::NotFound);
}

fn log_ready(icons: Option<Res<SectionIcons>>) {
    let generated = icons
        .map(|icons| icons.fallback.iter().filter(|f| **f).count())
        .unwrap_or(0);
    info!("site ready ({generated} generated icons)");
}

fn log_not_found(loader: Res<SiteLoader>) {
    warn!(
        "site entered not-found state: {}",
        loader.failure().unwrap_or("unknown reason")
    );
}
