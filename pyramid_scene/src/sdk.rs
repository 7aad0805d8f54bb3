//! SDK entry points and builder for composing the pyramid site.

use bevy::prelude::*;
use bevy_egui::EguiPlugin;

use crate::config::{self, report_settings, SiteSettings};
use crate::data::{loader_plugin, SectionDescriptor, SectionMapping, SiteLoader};
use crate::navigation::navigation_plugin;
use crate::pyramid::{pyramid_plugin, PyramidState, PyramidTuning, SectionCallback, SectionChanged};
use crate::render::render_plugin;
use crate::scene::{parallax_plugin, scene_plugin, Background};
use crate::ui::{overlay_plugin, status_plugin};

/// Builder for the Pyramind app: a hover-driven section pyramid with overlay.
pub struct PyramindBuilder {
    settings: SiteSettings,
    sections: Option<Vec<SectionDescriptor>>,
    tuning: Option<PyramidTuning>,
    background: Background,
    window_title: String,
    window_resolution: (f32, f32),
    clear_color: Color,
    on_section_change: Option<SectionCallback>,
    enable_overlay: bool,
    enable_parallax: bool,
}

impl Default for PyramindBuilder {
    fn default() -> Self {
        Self {
            settings: SiteSettings::default(),
            sections: None,
            tuning: None,
            background: Background::default(),
            window_title: "Farm Management Information System".to_string(),
            window_resolution: (1280.0, 720.0),
            clear_color: Color::srgb_u8(0x18, 0x18, 0x18),
            on_section_change: None,
            enable_overlay: true,
            enable_parallax: true,
        }
    }
}

impl PyramindBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load farm id, timeout, debounce and section order from the environment.
    pub fn site_settings(mut self) -> Self {
        self.settings = config::site_settings();
        self
    }

    pub fn settings(mut self, settings: SiteSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Load `farms/{id}.json` instead of the built-in section list.
    pub fn farm_id(mut self, id: impl Into<String>) -> Self {
        self.settings.farm_id = Some(id.into());
        self
    }

    /// Use these sections instead of the built-in list. Ignored when a farm
    /// id is set.
    pub fn sections(mut self, sections: Vec<SectionDescriptor>) -> Self {
        self.sections = Some(sections);
        self
    }

    pub fn section_mapping(mut self, mapping: SectionMapping) -> Self {
        self.settings.section_order = mapping;
        self
    }

    /// Override easing rates and rotation speed. The debounce from the site
    /// settings still applies.
    pub fn tuning(mut self, tuning: PyramidTuning) -> Self {
        self.tuning = Some(tuning);
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn window_resolution(mut self, width: f32, height: f32) -> Self {
        self.window_resolution = (width, height);
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Called once per hover change with the new block and section.
    pub fn on_section_change(
        mut self,
        callback: impl Fn(SectionChanged) + Send + Sync + 'static,
    ) -> Self {
        self.on_section_change = Some(SectionCallback(Box::new(callback)));
        self
    }

    pub fn disable_overlay(mut self) -> Self {
        self.enable_overlay = false;
        self
    }

    pub fn disable_parallax(mut self) -> Self {
        self.enable_parallax = false;
        self
    }

    /// Build the Bevy app with the selected configuration and plugins.
    pub fn build(self) -> App {
        let tuning = PyramidTuning {
            hover_debounce: self.settings.hover_debounce,
            ..self.tuning.unwrap_or_default()
        };
        let mut loader = SiteLoader::new(
            self.settings.farm_id.clone(),
            self.settings.section_order,
            self.settings.asset_timeout,
        );
        if let Some(sections) = self.sections {
            loader = loader.with_preset(sections);
        }

        let mut app = App::new();
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: self.window_title,
                resolution: self.window_resolution.into(),
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(EguiPlugin)
        .insert_resource(ClearColor(self.clear_color))
        .insert_resource(self.settings)
        .insert_resource(self.background)
        .insert_resource(loader)
        .insert_resource(PyramidState::new(tuning))
        .add_systems(Startup, report_settings)
        .add_plugins((
            render_plugin,
            loader_plugin,
            scene_plugin,
            pyramid_plugin,
            navigation_plugin,
            status_plugin,
        ));

        if let Some(callback) = self.on_section_change {
            app.insert_resource(callback);
        }
        if self.enable_overlay {
            app.add_plugins(overlay_plugin);
        }
        if self.enable_parallax {
            app.add_plugins(parallax_plugin);
        }

        app
    }
}
