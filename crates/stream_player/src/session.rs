//! 直播会话
//!
//! 持有播放控制器、聊天存储和媒体源句柄。所有状态修改都发生在
//! 调用方线程上：媒体源事件由 `poll_events` 按到达顺序取出并应用。

use crossbeam_channel::TrySendError;
use serde::Serialize;
use stream_state::{
    ChatMessage, ChatStore, DisplayState, MediaEvent, PlaybackController, PlaybackState,
    SessionHost,
};
use tracing::{debug, warn};

use crate::{
    spawn_media_source, ConfigError, MediaCommand, MediaHandle, SessionConfig, SourceOptions,
};

/// 会话错误
#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to start media source: {0}")]
    Spawn(#[from] std::io::Error),
}

/// 可序列化的会话快照
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub playback: PlaybackState,
    pub display: DisplayState,
    pub error: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub draft: String,
}

pub struct StreamSession {
    config: SessionConfig,
    playback: PlaybackController,
    chat: ChatStore,
    media: MediaHandle,
}

impl StreamSession {
    /// 启动模拟媒体源并创建会话
    pub fn start(config: SessionConfig) -> Result<Self, SessionError> {
        let media = spawn_media_source(SourceOptions {
            warmup: config.warmup(),
            stall: config.stall(),
        })?;
        Ok(Self::with_media(config, media))
    }

    /// 使用外部媒体源创建会话，并把初始地址与音量下发给它
    pub fn with_media(config: SessionConfig, media: MediaHandle) -> Self {
        let playback = PlaybackController::with_volume(&config.source_url, config.default_volume);
        let mut chat = ChatStore::with_capacity(config.chat_capacity);
        chat.extend_from(config.welcome_messages.iter().cloned());

        let session = Self {
            config,
            playback,
            chat,
            media,
        };
        session.send_command(MediaCommand::Load(session.playback.state().source_url.clone()));
        session.send_command(MediaCommand::SetVolume(session.playback.state().volume));
        session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn playback(&self) -> &PlaybackState {
        self.playback.state()
    }

    pub fn display_state(&self) -> DisplayState {
        self.playback.display_state()
    }

    pub fn chat(&self) -> &ChatStore {
        &self.chat
    }

    /// 取出并应用所有已到达的媒体源事件，返回是否有事件被应用
    pub fn poll_events(&mut self) -> bool {
        let events: Vec<MediaEvent> = self.media.evt_rx.try_iter().collect();
        let changed = !events.is_empty();
        for event in events {
            debug!(event = event.name(), "media event");
            self.playback.apply(event);
        }
        changed
    }

    /// 翻转播放意图并同步给媒体源
    pub fn toggle_play(&mut self) -> &PlaybackState {
        let playing = self.playback.toggle_play().is_playing;
        self.sync_playing(playing);
        self.playback.state()
    }

    /// 开始播放（开始提示层）
    pub fn play(&mut self) -> &PlaybackState {
        let playing = self.playback.play().is_playing;
        self.sync_playing(playing);
        self.playback.state()
    }

    pub fn set_volume(&mut self, volume: f32) -> &PlaybackState {
        let volume = self.playback.set_volume(volume).volume;
        self.send_command(MediaCommand::SetVolume(volume));
        self.playback.state()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.chat.set_draft(text);
    }

    pub fn draft_mut(&mut self) -> &mut String {
        self.chat.draft_mut()
    }

    /// 以本地作者提交草稿。空白草稿被静默忽略。
    pub fn submit_draft(&mut self) -> bool {
        match self.chat.submit_draft(self.config.local_author.clone()) {
            Ok(len) => {
                debug!(len, "chat message sent");
                true
            }
            Err(err) => {
                debug!(error = %err, "chat submit ignored");
                false
            }
        }
    }

    pub fn is_moderator(&self, message: &ChatMessage) -> bool {
        message.is_from(&self.config.moderator)
    }

    /// 请求宿主重载整个会话
    pub fn request_full_reload<H: SessionHost + ?Sized>(&self, host: &mut H) {
        self.playback.request_full_reload(host);
    }

    /// 丢弃当前状态，用同一配置和一个新的媒体源重新开始
    pub fn reload(&mut self) -> Result<(), SessionError> {
        *self = Self::start(self.config.clone())?;
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            playback: self.playback.state().clone(),
            display: self.playback.display_state(),
            error: self.playback.last_error().map(|e| e.message.clone()),
            messages: self.chat.messages().cloned().collect(),
            draft: self.chat.draft().to_string(),
        }
    }

    fn sync_playing(&self, playing: bool) {
        // 错误状态下不再驱动媒体源
        if !self.playback.state().has_error {
            self.send_command(MediaCommand::SetPlaying(playing));
        }
    }

    fn send_command(&self, cmd: MediaCommand) {
        match self.media.cmd_tx.try_send(cmd) {
            Ok(()) => {}
            Err(TrySendError::Full(cmd)) => warn!(?cmd, "media command queue full"),
            Err(TrySendError::Disconnected(cmd)) => debug!(?cmd, "media source disconnected"),
        }
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        let _ = self.media.cmd_tx.try_send(MediaCommand::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{unbounded, Receiver, Sender};
    use std::time::{Duration, Instant};
    use stream_state::{HostCommand, MediaSourceError};

    /// 测试侧扮演媒体源
    fn manual_session(
        config: SessionConfig,
    ) -> (StreamSession, Receiver<MediaCommand>, Sender<MediaEvent>) {
        let (cmd_tx, cmd_rx) = unbounded();
        let (evt_tx, evt_rx) = unbounded();
        let session = StreamSession::with_media(config, MediaHandle { cmd_tx, evt_rx });
        (session, cmd_rx, evt_tx)
    }

    #[test]
    fn test_new_session_loads_source() {
        let (session, cmd_rx, _evt_tx) = manual_session(SessionConfig::default());
        let commands: Vec<_> = cmd_rx.try_iter().collect();

        assert_eq!(
            commands,
            vec![
                MediaCommand::Load(SessionConfig::default().source_url),
                MediaCommand::SetVolume(0.8),
            ]
        );
        assert_eq!(session.display_state(), DisplayState::Loading);
        assert_eq!(session.chat().len(), 2);
    }

    #[test]
    fn test_events_applied_in_delivery_order() {
        let (mut session, _cmd_rx, evt_tx) = manual_session(SessionConfig::default());
        evt_tx.send(MediaEvent::Ready).unwrap();
        evt_tx.send(MediaEvent::PlaybackStarted).unwrap();
        evt_tx.send(MediaEvent::BufferStart).unwrap();

        assert!(session.poll_events());
        assert_eq!(session.display_state(), DisplayState::Loading);
        assert!(session.playback().is_playing);

        evt_tx.send(MediaEvent::BufferEnd).unwrap();
        session.poll_events();
        assert_eq!(session.display_state(), DisplayState::Controls);
        assert!(!session.poll_events());
    }

    #[test]
    fn test_toggle_forwards_intent() {
        let (mut session, cmd_rx, evt_tx) = manual_session(SessionConfig::default());
        cmd_rx.try_iter().count();
        evt_tx.send(MediaEvent::Ready).unwrap();
        session.poll_events();

        assert!(session.play().is_playing);
        assert!(!session.toggle_play().is_playing);
        assert_eq!(
            cmd_rx.try_iter().collect::<Vec<_>>(),
            vec![MediaCommand::SetPlaying(true), MediaCommand::SetPlaying(false)]
        );
    }

    #[test]
    fn test_error_stops_driving_source() {
        let (mut session, cmd_rx, evt_tx) = manual_session(SessionConfig::default());
        cmd_rx.try_iter().count();
        evt_tx
            .send(MediaEvent::Error(MediaSourceError::new("unreachable")))
            .unwrap();
        session.poll_events();

        session.toggle_play();
        assert!(cmd_rx.try_iter().next().is_none());
        assert_eq!(session.display_state(), DisplayState::Error);
        assert_eq!(session.snapshot().error.as_deref(), Some("unreachable"));
    }

    #[test]
    fn test_volume_is_clamped_and_forwarded() {
        let (mut session, cmd_rx, _evt_tx) = manual_session(SessionConfig::default());
        cmd_rx.try_iter().count();

        assert_eq!(session.set_volume(2.0).volume, 1.0);
        assert_eq!(cmd_rx.try_recv(), Ok(MediaCommand::SetVolume(1.0)));
    }

    #[test]
    fn test_submit_uses_local_author() {
        let config = SessionConfig {
            local_author: "Viewer".into(),
            welcome_messages: Vec::new(),
            ..Default::default()
        };
        let (mut session, _cmd_rx, _evt_tx) = manual_session(config);

        session.set_draft("   ");
        assert!(!session.submit_draft());
        assert_eq!(session.chat().draft(), "   ");

        session.set_draft("hello");
        assert!(session.submit_draft());
        assert_eq!(
            session.chat().messages().collect::<Vec<_>>(),
            vec![&ChatMessage::new("Viewer", "hello")]
        );
        assert_eq!(session.chat().draft(), "");
    }

    #[test]
    fn test_moderator_highlight() {
        let (session, _cmd_rx, _evt_tx) = manual_session(SessionConfig::default());
        let flags: Vec<bool> = session
            .chat()
            .messages()
            .map(|m| session.is_moderator(m))
            .collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn test_reload_goes_to_host() {
        let (session, _cmd_rx, _evt_tx) = manual_session(SessionConfig::default());
        let (mut host_tx, host_rx) = unbounded::<HostCommand>();
        session.request_full_reload(&mut host_tx);
        assert_eq!(host_rx.try_recv(), Ok(HostCommand::ReloadSession));
    }

    #[test]
    fn test_drop_shuts_down_source() {
        let (session, cmd_rx, _evt_tx) = manual_session(SessionConfig::default());
        drop(session);
        assert_eq!(cmd_rx.try_iter().last(), Some(MediaCommand::Shutdown));
    }

    #[test]
    fn test_snapshot_serializes() {
        let (session, _cmd_rx, _evt_tx) = manual_session(SessionConfig::default());
        let value = serde_json::to_value(session.snapshot()).unwrap();

        assert_eq!(value["display"], "loading");
        assert_eq!(value["playback"]["is_loading"], true);
        assert_eq!(value["messages"][0]["author"], "Admin");
    }

    #[test]
    fn test_reload_with_simulated_source() {
        let config = SessionConfig {
            warmup_ms: 0,
            ..Default::default()
        };
        let mut session = StreamSession::start(config).unwrap();
        session.set_draft("hello");
        session.submit_draft();
        assert_eq!(session.chat().len(), 3);

        session.reload().unwrap();
        assert_eq!(session.chat().len(), 2);
        assert_eq!(session.display_state(), DisplayState::Loading);

        let deadline = Instant::now() + Duration::from_secs(2);
        while session.display_state() == DisplayState::Loading && Instant::now() < deadline {
            session.poll_events();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(session.display_state(), DisplayState::StartPrompt);
    }
}
