//! 模拟媒体源引擎
//!
//! 在独立线程上运行，通过两个有界通道与会话通信：
//! `MediaCommand` 进，`MediaEvent` 出。不做真实解码。

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use stream_state::{MediaEvent, MediaSourceError};
use tracing::{debug, warn};
use url::Url;

use crate::MediaCommand;

/// 命令轮询间隔
const TICK: Duration = Duration::from_millis(10);

/// 媒体源句柄
pub struct MediaHandle {
    pub cmd_tx: Sender<MediaCommand>,
    pub evt_rx: Receiver<MediaEvent>,
}

/// 模拟媒体源参数
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceOptions {
    /// 加载后到报告 ready 的时间
    pub warmup: Duration,
    /// 首次开始播放后模拟的缓冲时长
    pub stall: Option<Duration>,
}

/// 校验媒体地址：只接受带主机名的 http/https 地址
pub fn validate_source_url(raw: &str) -> Result<Url, MediaSourceError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| MediaSourceError::new(format!("Invalid source url: {}", e)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(MediaSourceError::new(format!(
                "Unsupported source scheme: {}",
                other
            )))
        }
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(MediaSourceError::new("Source url has no host"));
    }
    Ok(url)
}

/// 启动模拟媒体源线程
pub fn spawn_media_source(options: SourceOptions) -> std::io::Result<MediaHandle> {
    let (cmd_tx, cmd_rx) = bounded(32);
    let (evt_tx, evt_rx) = bounded(64);

    thread::Builder::new()
        .name("media-source".into())
        .spawn(move || {
            run_engine(cmd_rx, evt_tx, options);
        })?;

    Ok(MediaHandle { cmd_tx, evt_rx })
}

fn run_engine(cmd_rx: Receiver<MediaCommand>, evt_tx: Sender<MediaEvent>, options: SourceOptions) {
    let mut state = EngineState::new(evt_tx, options);

    loop {
        match cmd_rx.recv_timeout(TICK) {
            Ok(cmd) => {
                if !state.handle_command(cmd) {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        state.tick(Instant::now());
    }
    debug!("media source stopped");
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SourcePhase {
    Idle,
    WarmingUp { ready_at: Instant },
    Ready,
    Failed,
}

struct EngineState {
    evt_tx: Sender<MediaEvent>,
    options: SourceOptions,
    phase: SourcePhase,
    playing: bool,
    started: bool,
    volume: f32,
    stall_until: Option<Instant>,
}

impl EngineState {
    fn new(evt_tx: Sender<MediaEvent>, options: SourceOptions) -> Self {
        Self {
            evt_tx,
            options,
            phase: SourcePhase::Idle,
            playing: false,
            started: false,
            volume: 1.0,
            stall_until: None,
        }
    }

    fn handle_command(&mut self, cmd: MediaCommand) -> bool {
        match cmd {
            MediaCommand::Load(url) => {
                self.load(&url);
            }
            MediaCommand::SetPlaying(playing) => {
                self.playing = playing;
            }
            MediaCommand::SetVolume(vol) => {
                self.volume = vol.clamp(0.0, 1.0);
                debug!(volume = self.volume, "source volume");
            }
            MediaCommand::Shutdown => {
                return false;
            }
        }
        true
    }

    fn load(&mut self, raw: &str) {
        self.started = false;
        self.stall_until = None;

        match validate_source_url(raw) {
            Ok(url) => {
                debug!(%url, "loading source");
                self.phase = SourcePhase::WarmingUp {
                    ready_at: Instant::now() + self.options.warmup,
                };
            }
            Err(err) => {
                warn!(source = raw, error = %err, "source rejected");
                self.phase = SourcePhase::Failed;
                self.emit(MediaEvent::Error(err));
            }
        }
    }

    fn tick(&mut self, now: Instant) {
        if let SourcePhase::WarmingUp { ready_at } = self.phase {
            if now >= ready_at {
                self.phase = SourcePhase::Ready;
                self.emit(MediaEvent::Ready);
            }
        }

        if self.phase != SourcePhase::Ready {
            return;
        }

        // 只有第一次开始播放时报告
        if self.playing && !self.started {
            self.started = true;
            self.emit(MediaEvent::PlaybackStarted);
            if let Some(stall) = self.options.stall {
                self.stall_until = Some(now + stall);
                self.emit(MediaEvent::BufferStart);
            }
        }

        if let Some(until) = self.stall_until {
            if now >= until {
                self.stall_until = None;
                self.emit(MediaEvent::BufferEnd);
            }
        }
    }

    fn emit(&self, event: MediaEvent) {
        let _ = self.evt_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(2);

    fn spawn(options: SourceOptions) -> MediaHandle {
        spawn_media_source(options).unwrap()
    }

    #[test]
    fn test_validate_source_url() {
        assert!(validate_source_url("https://www.youtube.com/watch?v=aqz-KE-bpKQ").is_ok());
        assert!(validate_source_url("  http://example.com/live  ").is_ok());
        assert!(validate_source_url("ftp://example.com/live").is_err());
        assert!(validate_source_url("not a url").is_err());
        assert!(validate_source_url("").is_err());
    }

    #[test]
    fn test_ready_after_load() {
        let handle = spawn(SourceOptions::default());
        handle
            .cmd_tx
            .send(MediaCommand::Load("https://example.com/live".into()))
            .unwrap();

        assert_eq!(handle.evt_rx.recv_timeout(WAIT), Ok(MediaEvent::Ready));
        let _ = handle.cmd_tx.send(MediaCommand::Shutdown);
    }

    #[test]
    fn test_invalid_url_reports_error() {
        let handle = spawn(SourceOptions::default());
        handle
            .cmd_tx
            .send(MediaCommand::Load("file:///etc/passwd".into()))
            .unwrap();

        match handle.evt_rx.recv_timeout(WAIT) {
            Ok(MediaEvent::Error(err)) => assert!(err.message.contains("file")),
            other => panic!("unexpected event: {:?}", other),
        }
        let _ = handle.cmd_tx.send(MediaCommand::Shutdown);
    }

    #[test]
    fn test_playback_started_once() {
        let handle = spawn(SourceOptions::default());
        handle
            .cmd_tx
            .send(MediaCommand::Load("https://example.com/live".into()))
            .unwrap();
        handle.cmd_tx.send(MediaCommand::SetPlaying(true)).unwrap();

        assert_eq!(handle.evt_rx.recv_timeout(WAIT), Ok(MediaEvent::Ready));
        assert_eq!(
            handle.evt_rx.recv_timeout(WAIT),
            Ok(MediaEvent::PlaybackStarted)
        );

        handle.cmd_tx.send(MediaCommand::SetPlaying(false)).unwrap();
        handle.cmd_tx.send(MediaCommand::SetPlaying(true)).unwrap();
        assert!(handle
            .evt_rx
            .recv_timeout(Duration::from_millis(100))
            .is_err());
        let _ = handle.cmd_tx.send(MediaCommand::Shutdown);
    }

    #[test]
    fn test_simulated_stall() {
        let handle = spawn(SourceOptions {
            warmup: Duration::ZERO,
            stall: Some(Duration::from_millis(20)),
        });
        handle
            .cmd_tx
            .send(MediaCommand::Load("https://example.com/live".into()))
            .unwrap();
        handle.cmd_tx.send(MediaCommand::SetPlaying(true)).unwrap();

        let events: Vec<_> = (0..4)
            .filter_map(|_| handle.evt_rx.recv_timeout(WAIT).ok())
            .collect();
        assert_eq!(
            events,
            vec![
                MediaEvent::Ready,
                MediaEvent::PlaybackStarted,
                MediaEvent::BufferStart,
                MediaEvent::BufferEnd,
            ]
        );
        let _ = handle.cmd_tx.send(MediaCommand::Shutdown);
    }

    #[test]
    fn test_engine_stops_when_handle_dropped() {
        let handle = spawn(SourceOptions::default());
        let MediaHandle { cmd_tx, evt_rx } = handle;
        drop(cmd_tx);

        assert_eq!(
            evt_rx.recv_timeout(WAIT),
            Err(RecvTimeoutError::Disconnected)
        );
    }
}
