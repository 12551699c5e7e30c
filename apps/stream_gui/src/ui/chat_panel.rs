//! 聊天面板

use egui::{RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::theme::StreamTheme;

pub struct ChatPanel;

impl ChatPanel {
    pub fn show(ui: &mut Ui, state: &mut AppState) {
        egui::Frame::none()
            .fill(StreamTheme::BG_SURFACE)
            .inner_margin(egui::Margin::same(12.0))
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new("LIVE CHAT")
                                .color(StreamTheme::TEXT_PRIMARY)
                                .size(16.0)
                                .strong(),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                RichText::new(format!("{} msgs", state.session.chat().len()))
                                    .color(StreamTheme::NEON_GREEN)
                                    .size(11.0),
                            );
                        });
                    });

                    ui.separator();

                    let list_height = (ui.available_height() - 48.0).max(60.0);
                    ScrollArea::vertical()
                        .max_height(list_height)
                        .auto_shrink([false, false])
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            Self::messages(ui, state);
                        });

                    ui.separator();
                    Self::input_row(ui, state);
                });
            });
    }

    fn messages(ui: &mut Ui, state: &AppState) {
        for message in state.session.chat().messages() {
            let author_color = if state.session.is_moderator(message) {
                StreamTheme::NEON_PINK
            } else {
                StreamTheme::NEON_BLUE
            };

            ui.horizontal_wrapped(|ui| {
                ui.label(
                    RichText::new(format!("{}:", message.author))
                        .color(author_color)
                        .strong()
                        .size(13.0),
                );
                ui.label(
                    RichText::new(&message.text)
                        .color(StreamTheme::TEXT_PRIMARY)
                        .size(13.0),
                );
            });
        }
    }

    fn input_row(ui: &mut Ui, state: &mut AppState) {
        ui.horizontal(|ui| {
            let input_width = (ui.available_width() - 48.0).max(80.0);
            let response = ui.add(
                egui::TextEdit::singleline(state.session.draft_mut())
                    .hint_text("Say something...")
                    .desired_width(input_width),
            );

            let entered =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let clicked = ui.button("➤").clicked();

            if entered || clicked {
                state.send_message();
                response.request_focus();
            }
        });
    }
}
