//! Live Stream CLI

use std::path::PathBuf;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use stream_player::{SessionConfig, StreamSession};
use stream_state::{
    ChatStore, DisplayState, MediaSourceError, PlaybackController, PlaybackState, SessionHost,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stream-cli", about = "Drive the live stream session from the terminal")]
struct Args {
    /// 配置文件路径（默认 ./stream.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 把一串事件应用到新的播放控制器，逐步输出状态 JSON
    Replay {
        /// 覆盖配置中的媒体地址
        #[arg(long)]
        source: Option<String>,
        /// ready, buffer-start, buffer-end, started, error[:msg], toggle, play, volume=<v>, reload
        #[arg(required = true, value_delimiter = ',')]
        steps: Vec<Step>,
    },
    /// 依次提交聊天草稿，输出最终消息列表
    Chat {
        /// 覆盖配置中的本地作者
        #[arg(long)]
        author: Option<String>,
        /// 不带欢迎消息开始
        #[arg(long)]
        empty: bool,
        drafts: Vec<String>,
    },
    /// 对模拟媒体源运行完整会话，状态变化时输出快照
    Watch {
        #[arg(long, default_value_t = 3)]
        seconds: u64,
        /// 就绪后自动开始播放
        #[arg(long)]
        play: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Ready,
    BufferStart,
    BufferEnd,
    Started,
    Error(String),
    Toggle,
    Play,
    Volume(f32),
    Reload,
}

impl FromStr for Step {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if let Some(msg) = raw.strip_prefix("error:") {
            return Ok(Step::Error(msg.to_string()));
        }
        if let Some(v) = raw.strip_prefix("volume=") {
            return v
                .parse()
                .map(Step::Volume)
                .map_err(|_| format!("invalid volume: {}", v));
        }
        match raw {
            "ready" => Ok(Step::Ready),
            "buffer-start" => Ok(Step::BufferStart),
            "buffer-end" => Ok(Step::BufferEnd),
            "started" => Ok(Step::Started),
            "error" => Ok(Step::Error("source error".to_string())),
            "toggle" => Ok(Step::Toggle),
            "play" => Ok(Step::Play),
            "reload" => Ok(Step::Reload),
            other => Err(format!("unknown step: {}", other)),
        }
    }
}

#[derive(Serialize)]
struct StepReport<'a> {
    step: String,
    display: DisplayState,
    state: &'a PlaybackState,
}

/// 重载请求只记录下来，由 replay 循环执行
struct ReplayHost {
    pending: bool,
    initial_volume: f32,
}

impl ReplayHost {
    fn new(initial_volume: f32) -> Self {
        Self {
            pending: false,
            initial_volume,
        }
    }
}

impl SessionHost for ReplayHost {
    fn reload_session(&mut self) {
        self.pending = true;
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let config = SessionConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Replay { source, steps } => {
            let source = source.unwrap_or_else(|| config.source_url.clone());
            replay(&source, config.default_volume, &steps)
        }
        Command::Chat {
            author,
            empty,
            drafts,
        } => {
            let author = author.unwrap_or_else(|| config.local_author.clone());
            chat(&config, &author, empty, &drafts)
        }
        Command::Watch { seconds, play } => watch(config, Duration::from_secs(seconds), play),
    }
}

fn replay(source: &str, volume: f32, steps: &[Step]) -> Result<()> {
    let mut controller = PlaybackController::with_volume(source, volume);
    let mut host = ReplayHost::new(volume);

    for step in steps {
        apply_step(&mut controller, &mut host, step);

        let report = StepReport {
            step: format!("{:?}", step),
            display: controller.display_state(),
            state: controller.state(),
        };
        println!("{}", serde_json::to_string(&report)?);
    }
    Ok(())
}

/// 应用一个脚本步骤；宿主收到重载请求时用同一地址和初始音量重建控制器
fn apply_step(controller: &mut PlaybackController, host: &mut ReplayHost, step: &Step) {
    match step {
        Step::Ready => {
            controller.on_ready();
        }
        Step::BufferStart => {
            controller.on_buffer_start();
        }
        Step::BufferEnd => {
            controller.on_buffer_end();
        }
        Step::Started => {
            controller.on_playback_started();
        }
        Step::Error(msg) => {
            controller.on_source_error(MediaSourceError::new(msg.clone()));
        }
        Step::Toggle => {
            controller.toggle_play();
        }
        Step::Play => {
            controller.play();
        }
        Step::Volume(v) => {
            controller.set_volume(*v);
        }
        Step::Reload => {
            controller.request_full_reload(host);
        }
    }

    if std::mem::take(&mut host.pending) {
        tracing::debug!("replay reload, controller re-initialized");
        *controller = PlaybackController::with_volume(
            controller.state().source_url.clone(),
            host.initial_volume,
        );
    }
}

fn chat(config: &SessionConfig, author: &str, empty: bool, drafts: &[String]) -> Result<()> {
    let mut store = ChatStore::with_capacity(config.chat_capacity);
    if !empty {
        store.extend_from(config.welcome_messages.iter().cloned());
    }

    for draft in drafts {
        store.set_draft(draft.as_str());
        if let Err(e) = store.submit_draft(author) {
            tracing::debug!(draft = %draft, error = %e, "chat draft skipped");
            eprintln!("skipped {:?}: {}", draft, e);
        }
    }

    let messages: Vec<_> = store.messages().collect();
    println!("{}", serde_json::to_string_pretty(&messages)?);
    Ok(())
}

fn watch(config: SessionConfig, duration: Duration, autoplay: bool) -> Result<()> {
    let mut session = StreamSession::start(config)?;
    let deadline = Instant::now() + duration;
    let mut last = None;

    while Instant::now() < deadline {
        session.poll_events();

        let display = session.display_state();
        if autoplay && display == DisplayState::StartPrompt {
            session.play();
        }

        let snapshot = session.snapshot();
        let line = serde_json::to_string(&snapshot)?;
        if last.as_ref() != Some(&line) {
            println!("{}", line);
            last = Some(line);
        }

        if session.display_state().is_terminal() {
            break;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!("ready".parse::<Step>(), Ok(Step::Ready));
        assert_eq!(" buffer-end ".parse::<Step>(), Ok(Step::BufferEnd));
        assert_eq!("volume=0.3".parse::<Step>(), Ok(Step::Volume(0.3)));
        assert_eq!(
            "error:timeout".parse::<Step>(),
            Ok(Step::Error("timeout".to_string()))
        );
        assert!("volume=loud".parse::<Step>().is_err());
        assert!("rewind".parse::<Step>().is_err());
    }

    #[test]
    fn test_args_parse_replay() {
        let args = Args::try_parse_from([
            "stream-cli",
            "replay",
            "--source",
            "u1",
            "buffer-start,buffer-end,ready,toggle",
        ])
        .unwrap();

        match args.command {
            Command::Replay { source, steps } => {
                assert_eq!(source.as_deref(), Some("u1"));
                assert_eq!(
                    steps,
                    vec![Step::BufferStart, Step::BufferEnd, Step::Ready, Step::Toggle]
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_replay_reload_resets_state() {
        let mut controller = PlaybackController::with_volume("https://example.com/live", 0.5);
        let mut host = ReplayHost::new(0.5);

        for step in [Step::Ready, Step::Toggle, Step::Volume(0.9), Step::Error("x".into())] {
            apply_step(&mut controller, &mut host, &step);
        }
        assert_eq!(controller.display_state(), DisplayState::Error);

        apply_step(&mut controller, &mut host, &Step::Reload);
        let state = controller.state();
        assert!(!state.has_error);
        assert!(state.is_loading);
        assert!(!state.is_playing);
        assert_eq!(state.volume, 0.5);
        assert_eq!(state.source_url, "https://example.com/live");
        assert_eq!(controller.display_state(), DisplayState::Loading);
        assert!(controller.last_error().is_none());
        assert!(!host.pending);
    }

    #[test]
    fn test_replay_runs_script() {
        let steps = vec![Step::BufferStart, Step::BufferEnd, Step::Ready, Step::Toggle];
        assert!(replay("https://example.com/live", 0.8, &steps).is_ok());
    }
}
