//! Live Stream GUI

mod state;
mod ui;

use eframe::egui;
use stream_player::{SessionConfig, StreamSession};
use tracing_subscriber::EnvFilter;

use state::AppState;
use ui::{ChatPanel, StatusBar, StreamTheme, VideoStage};

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match SessionConfig::load(None) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "invalid config, using defaults");
            SessionConfig::default()
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 680.0])
            .with_min_inner_size([640.0, 420.0])
            .with_title("Live Stream"),
        ..Default::default()
    };

    eframe::run_native(
        "Live Stream",
        options,
        Box::new(|cc| {
            StreamTheme::apply(&cc.egui_ctx);

            let session = StreamSession::start(config)?;
            Ok(Box::new(StreamApp {
                state: AppState::new(session),
            }))
        }),
    )
}

struct StreamApp {
    state: AppState,
}

impl eframe::App for StreamApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.poll_events() {
            ctx.request_repaint();
        }

        let is_narrow = ctx.screen_rect().width() < 800.0;

        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .show(ctx, |ui| {
                StatusBar::show(ui, &mut self.state);
            });

        // 窄屏时聊天放在底部
        if is_narrow {
            egui::TopBottomPanel::bottom("chat_panel")
                .resizable(true)
                .default_height(ctx.screen_rect().height() * 0.45)
                .show(ctx, |ui| {
                    ChatPanel::show(ui, &mut self.state);
                });
        } else {
            egui::SidePanel::right("chat_panel")
                .resizable(true)
                .default_width(340.0)
                .min_width(260.0)
                .max_width(480.0)
                .show(ctx, |ui| {
                    ChatPanel::show(ui, &mut self.state);
                });
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                VideoStage::show(ui, &mut self.state);
            });

        // 媒体源事件在后台线程产生，需要持续轮询
        ctx.request_repaint_after(std::time::Duration::from_millis(50));
    }
}
