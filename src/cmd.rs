use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::api_client::EventsApiClient;
use crate::config::{Settings, DEFAULT_CONFIG_FILE};
use crate::error::Error;
use crate::images::ImageFetcher;
use crate::navigation::NavigationState;
use crate::repository::{Deliveries, EventRepository};
use crate::view;

const BROWSE_HELP: &str = "commands: n(ext), p(rev), <number> to jump, r(eload), q(uit)";

#[derive(Parser, Debug)]
#[command(name = "cagecard", about = "Browse upcoming MMA fight cards")]
pub struct Cli {
    /// Overrides the events endpoint from config and env.
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub cmd: Cmd,
}

impl Cli {
    pub fn settings(&self) -> Result<Settings, Error> {
        let mut settings = Settings::load(&self.config)?;
        if let Some(endpoint) = &self.endpoint {
            settings.endpoint = endpoint.clone();
        }
        Ok(settings)
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Cmd {
    /// Print every event on one line each.
    List,
    /// Print a single fight card.
    Show {
        #[arg(long, default_value_t = 0)]
        index: usize,
        /// Also fetch each fighter's flag and portrait.
        #[arg(long)]
        images: bool,
    },
    /// Page through the cards interactively.
    Browse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Previous,
    Jump(usize),
    Reload,
    Quit,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown command {0:?}, expected n, p, r, q or an index")]
pub struct UnknownCommand(String);

impl FromStr for NavCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "n" | "next" => Ok(NavCommand::Next),
            "p" | "prev" | "previous" => Ok(NavCommand::Previous),
            "r" | "reload" => Ok(NavCommand::Reload),
            "q" | "quit" => Ok(NavCommand::Quit),
            other => other
                .parse::<usize>()
                .map(NavCommand::Jump)
                .map_err(|_| UnknownCommand(s.into())),
        }
    }
}

impl NavCommand {
    /// Applies a navigation command; `Reload` and `Quit` are handled by
    /// the caller. Returns whether the selection moved.
    pub fn apply(self, state: &mut NavigationState) -> bool {
        match self {
            NavCommand::Next => state.move_next(),
            NavCommand::Previous => state.move_previous(),
            NavCommand::Jump(index) => state.jump_to(index),
            NavCommand::Reload | NavCommand::Quit => false,
        }
    }
}

/// Runs the interactive loop until `q` or end of input and hands the state
/// back. This task is the only writer of `state`: deliveries from the
/// repository are applied here, never on the fetch task.
pub async fn browse<R>(
    repo: EventRepository,
    mut deliveries: Deliveries,
    mut state: NavigationState,
    input: R,
) -> anyhow::Result<NavigationState>
where
    R: AsyncBufRead + Unpin,
{
    let mut selection = state.subscribe();
    let mut lines = input.lines();

    println!("{}", view::card(&selection.borrow_and_update()));
    println!("{BROWSE_HELP}");
    repo.fetch();

    loop {
        tokio::select! {
            Some(events) = deliveries.recv() => state.set_events(events),
            Ok(()) = selection.changed() => {
                println!("{}", view::card(&selection.borrow_and_update()));
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.parse::<NavCommand>() {
                    Ok(NavCommand::Quit) => break,
                    Ok(NavCommand::Reload) => {
                        repo.fetch();
                    }
                    Ok(cmd) => {
                        if !cmd.apply(&mut state) {
                            debug!(?cmd, "navigation had no effect");
                        }
                    }
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    Ok(state)
}

async fn show(
    repo: &EventRepository,
    settings: &Settings,
    index: usize,
    images: bool,
) -> anyhow::Result<()> {
    let mut state = NavigationState::new();
    if let Some(events) = repo.load().await {
        state.set_events(events);
    }
    state.jump_to(index);
    println!("{}", view::card(&state.selection()));

    if let (Some(event), true) = (state.selected(), images) {
        let fetcher = ImageFetcher::new(settings)?;
        println!("Images:");
        for fight in &event.fights {
            for fighter in [&fight.fighter_a, &fight.fighter_b] {
                let images = fetcher.fighter_images(fighter).await;
                println!("{}", view::images_line(&fighter.name, &images));
            }
        }
    }
    Ok(())
}

async fn list(repo: &EventRepository) {
    let Some(events) = repo.load().await else {
        println!("no events loaded");
        return;
    };
    for (i, event) in events.iter().enumerate() {
        println!("{i:>3}  {}  {}", event.date, event.title);
    }
}

impl Cmd {
    pub async fn run(self, settings: Settings) -> anyhow::Result<()> {
        let client = EventsApiClient::new(&settings)?;
        debug!(endpoint = client.endpoint(), "using events endpoint");
        let (repo, deliveries) = EventRepository::new(Arc::new(client));

        match self {
            Cmd::List => list(&repo).await,
            Cmd::Show { index, images } => show(&repo, &settings, index, images).await?,
            Cmd::Browse => {
                let stdin = BufReader::new(tokio::io::stdin());
                browse(repo, deliveries, NavigationState::new(), stdin).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::io::AsyncWriteExt;
    use tokio::sync::watch;

    use super::*;
    use crate::client::EventSource;
    use crate::error::DecodeError;
    use crate::navigation::Selection;
    use crate::types::fixtures::event;
    use crate::types::{Event, EventsResponse};

    /// Answers each fetch with the next scripted list; `None` or an empty
    /// script fails the fetch.
    struct ScriptedSource {
        calls: AtomicUsize,
        script: Mutex<VecDeque<Option<Vec<Event>>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Option<Vec<Event>>>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script: Mutex::new(script.into()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EventSource for ScriptedSource {
        async fn fetch_events(&self) -> Result<EventsResponse, Error> {
            let next = self.script.lock().unwrap().pop_front().flatten();
            self.calls.fetch_add(1, Ordering::SeqCst);
            match next {
                Some(data) => Ok(EventsResponse { data }),
                None => {
                    let e = serde_json::from_str::<EventsResponse>("{}").unwrap_err();
                    Err(DecodeError::new("scripted", e).into())
                }
            }
        }
    }

    async fn wait_for(rx: &mut watch::Receiver<Selection>, done: impl Fn(&Selection) -> bool) {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                if done(&*rx.borrow_and_update()) {
                    break;
                }
                rx.changed().await.unwrap();
            }
        })
        .await
        .unwrap();
    }

    async fn wait_for_calls(source: &ScriptedSource, calls: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while source.calls() < calls {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[test]
    fn test_parse_nav_commands() {
        assert_eq!("n".parse::<NavCommand>(), Ok(NavCommand::Next));
        assert_eq!(" Next ".parse::<NavCommand>(), Ok(NavCommand::Next));
        assert_eq!("p".parse::<NavCommand>(), Ok(NavCommand::Previous));
        assert_eq!("prev".parse::<NavCommand>(), Ok(NavCommand::Previous));
        assert_eq!("2".parse::<NavCommand>(), Ok(NavCommand::Jump(2)));
        assert_eq!("r".parse::<NavCommand>(), Ok(NavCommand::Reload));
        assert_eq!("quit".parse::<NavCommand>(), Ok(NavCommand::Quit));
        assert_eq!(
            "-1".parse::<NavCommand>(),
            Err(UnknownCommand("-1".into()))
        );
        assert!("jump".parse::<NavCommand>().is_err());
    }

    #[test]
    fn test_apply_drives_navigation() {
        let mut state = NavigationState::new();
        state.set_events(vec![event("E0"), event("E1")]);

        assert!(NavCommand::Next.apply(&mut state));
        assert!(!NavCommand::Next.apply(&mut state));
        assert!(NavCommand::Jump(0).apply(&mut state));
        assert!(!NavCommand::Jump(5).apply(&mut state));
        assert!(!NavCommand::Previous.apply(&mut state));
        assert!(!NavCommand::Reload.apply(&mut state));
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn test_cli_args() {
        let cli = Cli::try_parse_from([
            "cagecard",
            "show",
            "--index",
            "3",
            "--images",
            "--endpoint",
            "http://localhost:8080/",
        ])
        .unwrap();

        assert_eq!(
            cli.cmd,
            Cmd::Show {
                index: 3,
                images: true
            }
        );
        assert_eq!(cli.endpoint.as_deref(), Some("http://localhost:8080/"));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
    }

    #[test]
    fn test_cli_endpoint_overrides_settings() {
        let _guard = crate::config::ENV_LOCK.lock().unwrap();
        std::env::remove_var("CAGECARD_TIMEOUT_SECS");
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("cagecard.toml");
        std::fs::write(&config, "endpoint = \"http://file.example/\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "cagecard",
            "--config",
            config.to_str().unwrap(),
            "--endpoint",
            "http://flag.example/",
            "list",
        ])
        .unwrap();

        assert_eq!(cli.settings().unwrap().endpoint, "http://flag.example/");
    }

    #[tokio::test]
    async fn test_browse_failed_reload_keeps_selection() {
        let events = vec![event("E0"), event("E1"), event("E2")];
        let source = ScriptedSource::new(vec![Some(events.clone()), None]);
        let (repo, deliveries) = EventRepository::new(source.clone());
        let state = NavigationState::new();
        let mut rx = state.subscribe();
        let (mut keys, input) = tokio::io::duplex(64);

        let ui = tokio::spawn(browse(repo, deliveries, state, BufReader::new(input)));

        wait_for(&mut rx, |s| s.count == 3).await;
        keys.write_all(b"n\n").await.unwrap();
        wait_for(&mut rx, |s| s.selected_index == 1).await;

        keys.write_all(b"r\n").await.unwrap();
        wait_for_calls(&source, 2).await;
        drop(keys);

        let state = ui.await.unwrap().unwrap();
        assert_eq!(state.events(), events.as_slice());
        assert_eq!(state.selected_index(), 1);
        assert_eq!(state.selected(), Some(&events[1]));
    }

    #[tokio::test]
    async fn test_browse_reload_resets_to_first_event() {
        let first = vec![event("E0"), event("E1"), event("E2")];
        let second = vec![event("F0"), event("F1")];
        let source = ScriptedSource::new(vec![Some(first.clone()), Some(second.clone())]);
        let (repo, deliveries) = EventRepository::new(source.clone());
        let state = NavigationState::new();
        let mut rx = state.subscribe();
        let (mut keys, input) = tokio::io::duplex(64);

        let ui = tokio::spawn(browse(repo, deliveries, state, BufReader::new(input)));

        wait_for(&mut rx, |s| s.selected.as_ref() == Some(&first[0])).await;
        keys.write_all(b"n\n").await.unwrap();
        wait_for(&mut rx, |s| s.selected.as_ref() == Some(&first[1])).await;

        keys.write_all(b"r\n").await.unwrap();
        wait_for(&mut rx, |s| s.selected.as_ref() == Some(&second[0])).await;
        drop(keys);

        let state = ui.await.unwrap().unwrap();
        assert_eq!(state.events(), second.as_slice());
        assert_eq!(state.selected_index(), 0);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_browse_exits_on_end_of_input() {
        let source = ScriptedSource::new(vec![None]);
        let (repo, deliveries) = EventRepository::new(source);

        let state = browse(
            repo,
            deliveries,
            NavigationState::new(),
            BufReader::new(tokio::io::empty()),
        )
        .await
        .unwrap();

        assert!(state.is_empty());
        assert_eq!(state.selection(), Selection::default());
    }

    #[tokio::test]
    async fn test_browse_quits_and_ignores_unknown_commands() {
        let source = ScriptedSource::new(vec![None]);
        let (repo, deliveries) = EventRepository::new(source);
        let input: &[u8] = b"bogus\nn\nq\nn\n";

        let state = browse(repo, deliveries, NavigationState::new(), input)
            .await
            .unwrap();

        assert_eq!(state.selected_index(), 0);
        assert!(state.selected().is_none());
    }
}
