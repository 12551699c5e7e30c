//! 主题定义

use egui::{Color32, Rounding, Stroke, Style, Visuals};

/// 霓虹深色主题
pub struct StreamTheme;

impl StreamTheme {
    // 颜色定义
    pub const BG_DEEP: Color32 = Color32::from_rgb(10, 10, 16);
    pub const BG_SURFACE: Color32 = Color32::from_rgb(20, 20, 30);
    pub const NEON_BLUE: Color32 = Color32::from_rgb(0, 200, 255);
    pub const NEON_PINK: Color32 = Color32::from_rgb(255, 60, 170);
    pub const NEON_GREEN: Color32 = Color32::from_rgb(60, 255, 140);
    pub const LIVE_RED: Color32 = Color32::from_rgb(239, 68, 68);
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 240);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(140, 140, 155);
    pub const BORDER: Color32 = Color32::from_rgb(45, 45, 58);

    /// 应用主题到 egui context
    pub fn apply(ctx: &egui::Context) {
        let mut style = Style::default();
        let mut visuals = Visuals::dark();

        visuals.panel_fill = Self::BG_DEEP;
        visuals.window_fill = Self::BG_SURFACE;
        visuals.extreme_bg_color = Self::BG_DEEP;
        visuals.faint_bg_color = Self::BG_SURFACE;

        visuals.widgets.inactive.bg_fill = Self::BG_SURFACE;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Self::TEXT_PRIMARY);
        visuals.widgets.inactive.rounding = Rounding::same(14.0);

        visuals.widgets.hovered.bg_fill = Self::NEON_BLUE.gamma_multiply(0.2);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Self::NEON_BLUE);
        visuals.widgets.hovered.rounding = Rounding::same(14.0);

        visuals.widgets.active.bg_fill = Self::NEON_BLUE;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, Self::BG_DEEP);
        visuals.widgets.active.rounding = Rounding::same(14.0);

        visuals.selection.bg_fill = Self::NEON_BLUE.gamma_multiply(0.4);
        visuals.selection.stroke = Stroke::new(1.0, Self::NEON_BLUE);
        visuals.window_stroke = Stroke::new(1.0, Self::BORDER);

        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);

        ctx.set_style(style);
    }
}
