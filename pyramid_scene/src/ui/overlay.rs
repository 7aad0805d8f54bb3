//! Text overlay: section headline, links panel and farm branding.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::anim::ease_toward;
use crate::data::{SiteState, Sections};
use crate::navigation::NavigationRequested;
use crate::pyramid::{invoke_section_callback, SectionChanged};

/// Headline colour per section descriptor.
pub const SECTION_COLORS: [egui::Color32; 4] = [
    egui::Color32::from_rgb(125, 211, 252),
    egui::Color32::from_rgb(110, 231, 183),
    egui::Color32::from_rgb(252, 211, 77),
    egui::Color32::from_rgb(249, 168, 212),
];

/// Seconds the links panel stays up after the hover ends.
pub const LINKS_LINGER: f32 = 2.0;

const HEADLINE_RATE: f32 = 12.0;
const HEADLINE_TRAVEL: f32 = 40.0;
const HIDDEN_OPACITY: f32 = 0.01;
const BRAND_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 43, 91);
const DESCRIPTION_COLOR: egui::Color32 = egui::Color32::from_rgb(212, 212, 212);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeadlinePhase {
    Entering,
    Exiting,
}

/// One headline as drawn this frame. `offset` is in screen points, positive
/// below its resting place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlineFrame {
    pub section: usize,
    pub phase: HeadlinePhase,
    pub opacity: f32,
    pub offset: f32,
}

impl HeadlineFrame {
    fn new(section: usize) -> Self {
        Self {
            section,
            phase: HeadlinePhase::Entering,
            opacity: 0.0,
            offset: HEADLINE_TRAVEL,
        }
    }

    fn step(&mut self, dt: f32) {
        let target = match self.phase {
            HeadlinePhase::Entering => 1.0,
            HeadlinePhase::Exiting => 0.0,
        };
        self.opacity = ease_toward(self.opacity, target, HEADLINE_RATE, dt);
        self.offset = match self.phase {
            HeadlinePhase::Entering => (1.0 - self.opacity) * HEADLINE_TRAVEL,
            HeadlinePhase::Exiting => -(1.0 - self.opacity) * HEADLINE_TRAVEL,
        };
    }
}

/// Enter/exit animation for the section headline, keyed by section so that
/// switching sections exits the old headline and restarts the entrance.
#[derive(Debug, Default)]
pub struct HeadlineAnimator {
    frames: Vec<HeadlineFrame>,
}

impl HeadlineAnimator {
    pub fn show(&mut self, section: Option<usize>) {
        let current = self
            .frames
            .iter()
            .find(|frame| frame.phase == HeadlinePhase::Entering)
            .map(|frame| frame.section);
        if current == section {
            return;
        }
        for frame in &mut self.frames {
            frame.phase = HeadlinePhase::Exiting;
        }
        if let Some(section) = section {
            self.frames.push(HeadlineFrame::new(section));
        }
    }

    pub fn step(&mut self, dt: f32) {
        for frame in &mut self.frames {
            frame.step(dt);
        }
        self.frames.retain(|frame| {
            frame.phase == HeadlinePhase::Entering || frame.opacity > HIDDEN_OPACITY
        });
    }

    pub fn frames(&self) -> &[HeadlineFrame] {
        &self.frames
    }

    pub fn is_idle(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Secondary links for the hovered section, kept on screen for
/// [`LINKS_LINGER`] seconds after the hover ends.
#[derive(Debug, Default)]
pub struct LinksPanel {
    section: Option<usize>,
    linger: f32,
}

impl LinksPanel {
    pub fn update(&mut self, hovered: Option<usize>, dt: f32) {
        match hovered {
            Some(section) => {
                self.section = Some(section);
                self.linger = LINKS_LINGER;
            }
            None if self.section.is_some() => {
                self.linger -= dt;
                if self.linger <= 0.0 {
                    self.section = None;
                    self.linger = 0.0;
                }
            }
            None => {}
        }
    }

    pub fn visible(&self) -> Option<usize> {
        self.section
    }
}

#[derive(Resource, Debug, Default)]
pub struct OverlayState {
    pub section: Option<usize>,
    pub headline: HeadlineAnimator,
    pub links: LinksPanel,
}

pub fn overlay_plugin(app: &mut App) {
    app.init_resource::<OverlayState>()
        .add_systems(OnEnter(SiteState::Ready), reset_overlay)
        .add_systems(
            Update,
            (track_section_changes, step_overlay, draw_overlay_system)
                .chain()
                .after(invoke_section_callback)
                .run_if(in_state(SiteState::Ready)),
        );
}

fn reset_overlay(mut overlay: ResMut<OverlayState>) {
    *overlay = OverlayState::default();
}

fn track_section_changes(
    mut changes: EventReader<SectionChanged>,
    mut overlay: ResMut<OverlayState>,
) {
    if let Some(change) = changes.read().last() {
        overlay.section = change.section;
        overlay.headline.show(change.section);
    }
}

fn step_overlay(time: Res<Time>, mut overlay: ResMut<OverlayState>) {
    let dt = time.delta_secs();
    let section = overlay.section;
    overlay.headline.step(dt);
    overlay.links.update(section, dt);
}

fn draw_overlay_system(
    mut contexts: EguiContexts,
    overlay: Res<OverlayState>,
    sections: Res<Sections>,
    mut navigation: EventWriter<NavigationRequested>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    for (slot, frame) in overlay.headline.frames().iter().enumerate() {
        let Some(descriptor) = sections.descriptors.get(frame.section) else {
            continue;
        };
        let color = SECTION_COLORS[frame.section % SECTION_COLORS.len()];
        egui::Area::new(egui::Id::new(("headline", frame.section, slot)))
            .anchor(egui::Align2::LEFT_CENTER, [80.0, frame.offset])
            .interactable(false)
            .show(ctx, |ui| {
                ui.set_opacity(frame.opacity);
                ui.label(
                    egui::RichText::new(&descriptor.name)
                        .size(72.0)
                        .strong()
                        .color(color),
                );
                if !descriptor.description.is_empty() {
                    ui.add_space(16.0);
                    ui.set_max_width(512.0);
                    ui.label(
                        egui::RichText::new(&descriptor.description)
                            .size(18.0)
                            .color(DESCRIPTION_COLOR),
                    );
                }
            });
    }

    if let Some(section) = overlay.links.visible() {
        if let Some(descriptor) = sections.descriptors.get(section) {
            if !descriptor.links.is_empty() {
                egui::Window::new("Section links")
                    .anchor(egui::Align2::LEFT_BOTTOM, [80.0, -80.0])
                    .resizable(false)
                    .collapsible(false)
                    .title_bar(false)
                    .frame(
                        egui::Frame::default()
                            .fill(egui::Color32::from_rgba_premultiplied(15, 15, 25, 210))
                            .inner_margin(egui::Margin::same(12))
                            .corner_radius(egui::CornerRadius::same(6)),
                    )
                    .show(ctx, |ui| {
                        for link in &descriptor.links {
                            if ui.link(link.label.as_str()).clicked() {
                                navigation.send(NavigationRequested {
                                    url: link.href.clone(),
                                });
                            }
                        }
                    });
            }
        }
    }

    egui::Area::new(egui::Id::new("branding"))
        .anchor(egui::Align2::LEFT_TOP, [40.0, 40.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 0.0;
            for word in ["Farm", "Management", "Information", "System"] {
                let (initial, rest) = word.split_at(1);
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    ui.label(
                        egui::RichText::new(initial)
                            .size(28.0)
                            .strong()
                            .color(BRAND_COLOR),
                    );
                    ui.label(egui::RichText::new(rest).size(28.0).color(BRAND_COLOR));
                });
            }
        });

    if let Some(farm) = &sections.farm {
        egui::Area::new(egui::Id::new("farm"))
            .anchor(egui::Align2::RIGHT_TOP, [-40.0, 40.0])
            .show(ctx, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    ui.label(
                        egui::RichText::new(&farm.name)
                            .size(36.0)
                            .strong()
                            .color(BRAND_COLOR),
                    );
                    if ui.link("Open farm").clicked() {
                        navigation.send(NavigationRequested {
                            url: farm.link.clone(),
                        });
                    }
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn run(animator: &mut HeadlineAnimator, seconds: f32) {
        let steps = (seconds / FRAME).round() as usize;
        for _ in 0..steps {
            animator.step(FRAME);
        }
    }

    #[test]
    fn headline_enters_from_below() {
        let mut animator = HeadlineAnimator::default();
        animator.show(Some(2));
        animator.step(FRAME);

        let frame = animator.frames()[0];
        assert_eq!(frame.section, 2);
        assert!(frame.opacity > 0.0 && frame.opacity < 1.0);
        assert!(frame.offset > 0.0);

        run(&mut animator, 1.0);
        let frame = animator.frames()[0];
        assert!(frame.opacity > 0.99);
        assert!(frame.offset.abs() < 0.5);
    }

    #[test]
    fn headline_exits_upward_and_is_dropped() {
        let mut animator = HeadlineAnimator::default();
        animator.show(Some(0));
        run(&mut animator, 1.0);

        animator.show(None);
        animator.step(FRAME);
        let frame = animator.frames()[0];
        assert_eq!(frame.phase, HeadlinePhase::Exiting);
        assert!(frame.offset < 0.0);

        run(&mut animator, 2.0);
        assert!(animator.is_idle());
    }

    #[test]
    fn switching_sections_restarts_the_entrance() {
        let mut animator = HeadlineAnimator::default();
        animator.show(Some(0));
        run(&mut animator, 1.0);

        animator.show(Some(1));
        let frames = animator.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].phase, HeadlinePhase::Exiting);
        assert_eq!(frames[1].section, 1);
        assert_eq!(frames[1].phase, HeadlinePhase::Entering);
        assert_eq!(frames[1].opacity, 0.0);
    }

    #[test]
    fn showing_the_same_section_does_not_restart() {
        let mut animator = HeadlineAnimator::default();
        animator.show(Some(3));
        run(&mut animator, 0.5);
        let before = animator.frames()[0].opacity;

        animator.show(Some(3));
        assert_eq!(animator.frames().len(), 1);
        assert_eq!(animator.frames()[0].opacity, before);
    }

    #[test]
    fn links_panel_lingers_after_hover_ends() {
        let mut panel = LinksPanel::default();
        panel.update(Some(1), FRAME);
        assert_eq!(panel.visible(), Some(1));

        panel.update(None, 1.5);
        assert_eq!(panel.visible(), Some(1));

        panel.update(None, 0.6);
        assert_eq!(panel.visible(), None);
    }

    #[test]
    fn rehover_resets_the_linger() {
        let mut panel = LinksPanel::default();
        panel.update(Some(0), FRAME);
        panel.update(None, 1.9);
        panel.update(Some(2), FRAME);
        panel.update(None, 1.9);
        assert_eq!(panel.visible(), Some(2));
    }
}
