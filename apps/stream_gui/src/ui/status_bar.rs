//! 状态栏

use egui::{RichText, Ui};

use crate::state::AppState;
use crate::ui::theme::StreamTheme;

pub struct StatusBar;

impl StatusBar {
    pub fn show(ui: &mut Ui, state: &mut AppState) {
        ui.horizontal(|ui| {
            let live = state.session.playback().is_live();
            let (dot, label) = if live {
                (StreamTheme::LIVE_RED, "SIGNAL LIVE - 1080P")
            } else {
                (StreamTheme::TEXT_MUTED, "SIGNAL IDLE")
            };

            ui.label(RichText::new("●").color(dot).size(10.0));
            ui.label(
                RichText::new(label)
                    .color(StreamTheme::TEXT_MUTED)
                    .monospace()
                    .size(10.0),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let refresh = ui.link(
                    RichText::new("REFRESH PLAYER")
                        .color(StreamTheme::NEON_BLUE)
                        .monospace()
                        .size(10.0),
                );
                if refresh.clicked() {
                    state.request_reload();
                }
            });
        });
    }
}
