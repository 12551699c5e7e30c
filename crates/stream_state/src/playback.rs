//! 播放意图状态机
//!
//! 控制器只记录"意图"与媒体源报告的状态，不直接驱动媒体源。
//! 每个操作都返回变更后的状态，调用方据此重新渲染。

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::{DisplayState, MediaEvent, MediaSourceError, SessionHost};

/// 默认音量
pub const DEFAULT_VOLUME: f32 = 0.8;

/// 播放状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// 媒体地址，初始化后不再改变
    pub source_url: String,
    /// 播放意图，不是解码器的实际状态
    pub is_playing: bool,
    /// 线性增益 [0.0, 1.0]
    pub volume: f32,
    /// 缓冲中或尚未收到 ready
    pub is_loading: bool,
    /// 粘性错误标志，只有完整重载才能清除
    pub has_error: bool,
}

impl PlaybackState {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            is_playing: false,
            volume: DEFAULT_VOLUME,
            is_loading: true,
            has_error: false,
        }
    }

    /// 按优先级计算渲染状态：错误 > 加载 > 未播放 > 播放控制
    pub fn display_state(&self) -> DisplayState {
        if self.has_error {
            DisplayState::Error
        } else if self.is_loading {
            DisplayState::Loading
        } else if !self.is_playing {
            DisplayState::StartPrompt
        } else {
            DisplayState::Controls
        }
    }

    /// 信号是否在线（状态栏 LIVE/IDLE）
    pub fn is_live(&self) -> bool {
        self.is_playing && !self.has_error
    }
}

/// 播放控制器
#[derive(Debug, Clone)]
pub struct PlaybackController {
    state: PlaybackState,
    last_error: Option<MediaSourceError>,
}

impl PlaybackController {
    pub fn initialize(source_url: impl Into<String>) -> Self {
        Self {
            state: PlaybackState::new(source_url),
            last_error: None,
        }
    }

    /// 以指定初始音量初始化（超出范围时钳制）
    pub fn with_volume(source_url: impl Into<String>, volume: f32) -> Self {
        let mut controller = Self::initialize(source_url);
        controller.set_volume(volume);
        controller
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn display_state(&self) -> DisplayState {
        self.state.display_state()
    }

    /// 最近一次媒体源错误
    pub fn last_error(&self) -> Option<&MediaSourceError> {
        self.last_error.as_ref()
    }

    /// 将一个媒体源事件应用到状态上
    pub fn apply(&mut self, event: MediaEvent) -> &PlaybackState {
        match event {
            MediaEvent::Ready => self.on_ready(),
            MediaEvent::BufferStart => self.on_buffer_start(),
            MediaEvent::BufferEnd => self.on_buffer_end(),
            MediaEvent::PlaybackStarted => self.on_playback_started(),
            MediaEvent::Error(err) => self.on_source_error(err),
        }
    }

    pub fn on_ready(&mut self) -> &PlaybackState {
        if !self.frozen("ready") {
            info!(source = %self.state.source_url, "player ready");
            self.state.is_loading = false;
        }
        &self.state
    }

    pub fn on_buffer_start(&mut self) -> &PlaybackState {
        if !self.frozen("buffer_start") {
            // 播放中缓冲不改变播放意图
            self.state.is_loading = true;
        }
        &self.state
    }

    pub fn on_buffer_end(&mut self) -> &PlaybackState {
        if !self.frozen("buffer_end") {
            self.state.is_loading = false;
        }
        &self.state
    }

    pub fn on_playback_started(&mut self) -> &PlaybackState {
        if !self.frozen("playback_started") {
            info!(source = %self.state.source_url, "playback started");
            self.state.is_playing = true;
        }
        &self.state
    }

    /// 进入终态错误，不会自动重试
    pub fn on_source_error(&mut self, err: MediaSourceError) -> &PlaybackState {
        error!(source = %self.state.source_url, error = %err, "player error");
        self.state.has_error = true;
        self.state.is_loading = false;
        self.last_error = Some(err);
        &self.state
    }

    /// 翻转播放意图；调用方负责同步通知媒体源
    pub fn toggle_play(&mut self) -> &PlaybackState {
        if !self.frozen("toggle_play") {
            self.state.is_playing = !self.state.is_playing;
        }
        &self.state
    }

    /// 设置播放意图为播放（开始提示层的点击）
    pub fn play(&mut self) -> &PlaybackState {
        if !self.frozen("play") {
            self.state.is_playing = true;
        }
        &self.state
    }

    /// 设置音量。超出 [0, 1] 的值被钳制，NaN 被忽略。
    pub fn set_volume(&mut self, volume: f32) -> &PlaybackState {
        if volume.is_nan() {
            warn!("ignoring NaN volume");
            return &self.state;
        }
        let clamped = volume.clamp(0.0, 1.0);
        if clamped != volume {
            debug!(requested = volume, clamped, "volume clamped");
        }
        self.state.volume = clamped;
        &self.state
    }

    /// 请求宿主重载整个会话
    pub fn request_full_reload<H: SessionHost + ?Sized>(&self, host: &mut H) {
        info!(source = %self.state.source_url, "full reload requested");
        host.reload_session();
    }

    fn frozen(&self, transition: &'static str) -> bool {
        if self.state.has_error {
            debug!(transition, "ignored in error state");
        }
        self.state.has_error
    }
}
