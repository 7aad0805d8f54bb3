//! Loading spinner and the not-found screen.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::data::{SiteLoader, SiteState};

const NOT_FOUND_FILL: egui::Color32 = egui::Color32::from_rgb(250, 204, 21);
const NOT_FOUND_TEXT: egui::Color32 = egui::Color32::from_rgb(24, 24, 24);

pub fn status_plugin(app: &mut App) {
    app.add_systems(
        Update,
        (
            loading_spinner_system.run_if(in_state(SiteState::Loading)),
            not_found_system.run_if(in_state(SiteState::NotFound)),
        ),
    );
}

fn loading_spinner_system(mut contexts: EguiContexts) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    egui::Area::new(egui::Id::new("loading"))
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .interactable(false)
        .show(ctx, |ui| {
            ui.add(egui::Spinner::new().size(48.0));
        });
}

fn not_found_system(mut contexts: EguiContexts, loader: Res<SiteLoader>) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    egui::CentralPanel::default()
        .frame(egui::Frame::default().fill(NOT_FOUND_FILL))
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.4);
                ui.label(
                    egui::RichText::new("Not Found")
                        .size(96.0)
                        .strong()
                        .color(NOT_FOUND_TEXT),
                );
                if let Some(reason) = loader.failure() {
                    ui.add_space(12.0);
                    ui.label(
                        egui::RichText::new(reason)
                            .size(14.0)
                            .color(NOT_FOUND_TEXT.gamma_multiply(0.6)),
                    );
                }
            });
        });
}
