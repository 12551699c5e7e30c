//! 视频区域：按显示状态绘制覆盖层，底部为播放控制条

use egui::{Align, Color32, Layout, RichText, Ui};
use stream_state::DisplayState;

use crate::state::AppState;
use crate::ui::theme::StreamTheme;

pub struct VideoStage;

impl VideoStage {
    pub fn show(ui: &mut Ui, state: &mut AppState) {
        let controls_height = 56.0;
        let stage_height = (ui.available_height() - controls_height).max(120.0);

        egui::Frame::none()
            .fill(Color32::BLACK)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.set_height(stage_height);

                ui.vertical_centered(|ui| {
                    ui.add_space(stage_height * 0.3);
                    match state.session.display_state() {
                        DisplayState::Error => Self::error_overlay(ui, state),
                        DisplayState::Loading => Self::loading_overlay(ui),
                        DisplayState::StartPrompt => Self::start_overlay(ui, state),
                        DisplayState::Controls => Self::now_playing(ui, state),
                    }
                });
            });

        Self::transport_bar(ui, state, controls_height);
    }

    fn error_overlay(ui: &mut Ui, state: &mut AppState) {
        ui.label(
            RichText::new("SOURCE ERROR")
                .color(StreamTheme::LIVE_RED)
                .size(20.0)
                .strong(),
        );
        ui.label(
            RichText::new("Could not establish connection to stream server.")
                .color(StreamTheme::TEXT_MUTED)
                .size(12.0),
        );
        if let Some(fatal) = &state.fatal {
            ui.label(RichText::new(fatal).color(StreamTheme::TEXT_MUTED).size(11.0));
        }
        ui.add_space(16.0);
        if ui
            .button(RichText::new("FORCE RELOAD").color(StreamTheme::NEON_BLUE))
            .clicked()
        {
            state.request_reload();
        }
    }

    fn loading_overlay(ui: &mut Ui) {
        ui.add(egui::Spinner::new().size(36.0).color(StreamTheme::NEON_BLUE));
        ui.add_space(12.0);
        ui.label(
            RichText::new("INITIALIZING PLAYER...")
                .color(StreamTheme::TEXT_PRIMARY)
                .monospace()
                .size(11.0),
        );
    }

    fn start_overlay(ui: &mut Ui, state: &mut AppState) {
        ui.label(
            RichText::new("LIVE STREAM")
                .color(StreamTheme::TEXT_MUTED)
                .size(24.0),
        );
        ui.add_space(8.0);
        if ui
            .add(egui::Button::new(RichText::new("▶").size(36.0)).rounding(40.0))
            .clicked()
        {
            state.play();
        }
        ui.add_space(8.0);
        ui.label(
            RichText::new("Click to start playback")
                .color(StreamTheme::TEXT_MUTED)
                .monospace()
                .size(12.0),
        );
    }

    fn now_playing(ui: &mut Ui, state: &AppState) {
        ui.label(
            RichText::new(&state.session.playback().source_url)
                .color(StreamTheme::TEXT_MUTED)
                .monospace()
                .size(11.0),
        );
    }

    fn transport_bar(ui: &mut Ui, state: &mut AppState, height: f32) {
        egui::Frame::none()
            .fill(StreamTheme::BG_DEEP)
            .inner_margin(egui::Margin::symmetric(16.0, 8.0))
            .show(ui, |ui| {
                ui.set_min_height(height - 16.0);
                ui.horizontal(|ui| {
                    let playing = state.session.playback().is_playing;
                    let icon = if playing { "⏹" } else { "▶" };
                    if ui.button(RichText::new(icon).size(18.0)).clicked() {
                        state.toggle_play();
                    }

                    ui.label(
                        RichText::new("● LIVE")
                            .color(StreamTheme::LIVE_RED)
                            .strong()
                            .size(13.0),
                    );

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        Self::volume_control(ui, state);
                    });
                });
            });
    }

    fn volume_control(ui: &mut Ui, state: &mut AppState) {
        let mut volume = state.session.playback().volume;
        let slider = egui::Slider::new(&mut volume, 0.0..=1.0)
            .step_by(0.1)
            .show_value(false);
        if ui.add_sized([80.0, 16.0], slider).changed() {
            state.set_volume(volume);
        }

        let icon = if volume > 0.5 {
            "🔊"
        } else if volume > 0.0 {
            "🔉"
        } else {
            "🔇"
        };
        ui.label(icon);
    }
}
