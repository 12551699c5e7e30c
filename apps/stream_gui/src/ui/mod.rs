//! UI 模块

pub mod chat_panel;
pub mod stage;
pub mod status_bar;
pub mod theme;

pub use chat_panel::ChatPanel;
pub use stage::VideoStage;
pub use status_bar::StatusBar;
pub use theme::StreamTheme;
