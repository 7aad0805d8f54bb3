use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use pyramid_scene::data::{
    default_sections, loader_plugin, FarmConfig, SectionIcons, SectionMapping, Sections,
    SiteLoader, SiteState,
};

fn loading_app(loader: SiteLoader) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin))
        .init_asset::<Image>()
        .insert_resource(loader)
        .add_plugins(loader_plugin);
    app
}

fn state(app: &App) -> SiteState {
    *app.world().resource::<State<SiteState>>().get()
}

/// Runs frames until the loading phase ends, giving the asset server's IO
/// tasks time to finish between frames.
fn run_until_settled(app: &mut App) -> SiteState {
    for _ in 0..500 {
        app.update();
        if state(app) != SiteState::Loading {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    state(app)
}

fn failure(app: &App) -> String {
    app.world()
        .resource::<SiteLoader>()
        .failure()
        .unwrap_or_default()
        .to_string()
}

#[test]
fn demo_farm_document_is_a_valid_site() {
    let json = include_str!("../../assets/farms/demo.json");
    let config = FarmConfig::from_json(json).expect("demo farm parses");
    let sections = Sections::from_farm(config, SectionMapping::TopDown).expect("four sections");

    let farm = sections.farm.as_ref().expect("farm identity is kept");
    assert_eq!(farm.name, "Demo Farm");
    assert_eq!(sections.for_block(3).map(|s| s.name.as_str()), Some("Finances"));
    assert_eq!(sections.for_block(0).map(|s| s.name.as_str()), Some("Resources"));
    assert_eq!(
        sections.descriptors[0].icon_asset_path().as_deref(),
        Some("icons/euro.png")
    );
}

#[test]
fn unsafe_farm_id_ends_in_not_found() {
    let loader = SiteLoader::new(
        Some("../secrets".to_string()),
        SectionMapping::TopDown,
        Duration::from_secs(1),
    );
    let mut app = loading_app(loader);

    for _ in 0..3 {
        app.update();
    }

    assert_eq!(state(&app), SiteState::NotFound);
    let loader = app.world().resource::<SiteLoader>();
    assert!(loader.failure().is_some_and(|reason| reason.contains("../secrets")));
    assert!(app.world().get_resource::<Sections>().is_none());
}

#[test]
fn sections_without_icons_get_generated_glyphs() {
    let sections = default_sections()
        .into_iter()
        .map(|mut section| {
            section.icon = None;
            section
        })
        .collect();
    let loader = SiteLoader::new(None, SectionMapping::TopDown, Duration::from_secs(1))
        .with_preset(sections);
    let mut app = loading_app(loader);

    for _ in 0..4 {
        app.update();
    }

    assert_eq!(state(&app), SiteState::Ready);
    let icons = app.world().resource::<SectionIcons>();
    assert_eq!(icons.fallback, [true; 4]);
    let images = app.world().resource::<Assets<Image>>();
    assert!(icons.handles.iter().all(|handle| images.contains(handle)));
}

#[test]
fn wrong_section_count_ends_in_not_found() {
    let mut sections = default_sections();
    sections.pop();
    let loader = SiteLoader::new(None, SectionMapping::TopDown, Duration::from_secs(1))
        .with_preset(sections);
    let mut app = loading_app(loader);

    for _ in 0..3 {
        app.update();
    }

    assert_eq!(state(&app), SiteState::NotFound);
    let loader = app.world().resource::<SiteLoader>();
    assert!(loader
        .failure()
        .is_some_and(|reason| reason.contains("expected 4 sections, found 3")));
}

#[test]
fn missing_farm_document_ends_in_not_found() {
    let loader = SiteLoader::new(
        Some("nope".to_string()),
        SectionMapping::TopDown,
        Duration::from_secs(60),
    );
    let mut app = loading_app(loader);

    assert_eq!(run_until_settled(&mut app), SiteState::NotFound);
    let reason = failure(&app);
    assert!(
        reason.contains("farms/nope.json failed to load"),
        "unexpected reason: {reason}"
    );
    assert!(app.world().get_resource::<Sections>().is_none());
}

#[test]
fn farm_document_pending_at_the_timeout_ends_in_not_found() {
    let loader = SiteLoader::new(Some("slow".to_string()), SectionMapping::TopDown, Duration::ZERO);
    let mut app = loading_app(loader);

    assert_eq!(run_until_settled(&mut app), SiteState::NotFound);
    let reason = failure(&app);
    assert!(
        reason.contains("farms/slow.json did not load within"),
        "unexpected reason: {reason}"
    );
}

#[test]
fn icons_pending_at_the_timeout_get_generated_glyphs() {
    let sections = default_sections()
        .into_iter()
        .map(|mut section| {
            section.icon = Some("icons/never-arrives.png".to_string());
            section
        })
        .collect();
    let loader =
        SiteLoader::new(None, SectionMapping::TopDown, Duration::ZERO).with_preset(sections);
    let mut app = loading_app(loader);

    assert_eq!(run_until_settled(&mut app), SiteState::Ready);
    let icons = app.world().resource::<SectionIcons>();
    assert_eq!(icons.fallback, [true; 4]);
    assert!(app.world().get_resource::<Sections>().is_some());
}
