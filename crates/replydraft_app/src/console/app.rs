use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use replydraft_core::{update, AppState, AppViewModel, DraftState, GenerationConfig, Msg};
use replydraft_engine::{EngineSettings, GeminiGenerator};
use replydraft_logging::{draft_info, draft_warn};

use super::commands::{is_affirmative, parse_command, Command, HELP};
use super::effects::EffectRunner;
use super::{logging, render};
use crate::cli::Cli;
use crate::settings::{api_key_from_env, AppSettings};

/// Everything the console loop reacts to.
pub enum LoopEvent {
    /// Message produced by the engine.
    Ui(Msg),
    /// One line typed by the user.
    Line(String),
    /// Stdin reached end of file.
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let mut settings = AppSettings::load(cli.config.as_deref())?;
    settings.apply_cli(&cli);
    logging::initialize(&settings.log);
    draft_info!(
        "Starting replydraft ({}, {:?})",
        render::config_line(&settings.generation),
        settings.batch_mode
    );

    let api_key = api_key_from_env();
    if api_key.is_none() {
        draft_warn!("No API key in GEMINI_API_KEY or API_KEY");
        eprintln!("warning: GEMINI_API_KEY is not set; every draft will fail");
    }
    let generator = GeminiGenerator::new(settings.backend.to_gemini(api_key))?;

    let (loop_tx, loop_rx) = mpsc::channel();
    let effects = EffectRunner::new(
        Arc::new(generator),
        EngineSettings {
            batch_mode: settings.batch_mode,
        },
        loop_tx.clone(),
    )
    .context("failed to start the generation engine")?;
    let mut session = Session::new(
        AppState::with_config(settings.generation),
        effects,
        io::stdout(),
    );

    if cli.once {
        let links = read_links(cli.links.as_deref())?;
        session.run_once(&links, &loop_rx)?;
    } else {
        if let Some(path) = cli.links.as_deref() {
            let links = fs::read_to_string(path)
                .with_context(|| format!("failed to read links from {}", path.display()))?;
            session.submit_links(links)?;
        }
        spawn_stdin_reader(loop_tx);
        session.run_interactive(&loop_rx)?;
    }
    Ok(())
}

fn read_links(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read links from {}", path.display())),
        None => {
            let mut links = String::new();
            io::stdin()
                .read_to_string(&mut links)
                .context("failed to read links from stdin")?;
            Ok(links)
        }
    }
}

fn spawn_stdin_reader(tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(LoopEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(LoopEvent::InputClosed);
    });
}

struct Session<W: Write> {
    state: AppState,
    effects: EffectRunner,
    out: W,
    closing: bool,
}

impl<W: Write> Session<W> {
    fn new(state: AppState, effects: EffectRunner, out: W) -> Self {
        Self {
            state,
            effects,
            out,
            closing: false,
        }
    }

    fn view(&self) -> AppViewModel {
        self.state.view()
    }

    fn dispatch(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.effects.enqueue(effects);
        let was_dirty = state.consume_dirty();
        self.state = state;
        was_dirty
    }

    /// Nothing generating and no batch waiting for its end marker.
    fn settled(&self) -> bool {
        let view = self.view();
        !view.batch_in_flight && view.in_process_count == 0
    }

    fn run_once(&mut self, links: &str, rx: &mpsc::Receiver<LoopEvent>) -> io::Result<()> {
        self.submit_links(links.to_string())?;
        self.dispatch(Msg::GenerateAllClicked);
        while !self.settled() {
            match rx.recv() {
                Ok(LoopEvent::Ui(msg)) => {
                    self.dispatch(msg);
                }
                Ok(_) => {}
                Err(_) => break,
            }
        }
        writeln!(self.out, "{}", render::report(&self.view()))
    }

    fn run_interactive(&mut self, rx: &mpsc::Receiver<LoopEvent>) -> io::Result<()> {
        writeln!(
            self.out,
            "replydraft: paste post links, then 'all' to draft replies ('help' for commands)"
        )?;
        writeln!(self.out, "{}", render::config_line(&self.view().config))?;

        for event in rx.iter() {
            match event {
                LoopEvent::Ui(msg) => self.on_engine_msg(msg)?,
                LoopEvent::Line(line) => {
                    if self.on_line(&line)? == Flow::Quit {
                        break;
                    }
                }
                LoopEvent::InputClosed => self.closing = true,
            }
            if self.closing && self.settled() {
                break;
            }
        }
        self.out.flush()
    }

    fn submit_links(&mut self, links: String) -> io::Result<()> {
        self.dispatch(Msg::InputChanged(links));
        self.dispatch(Msg::LinksSubmitted);
        writeln!(self.out, "{}", render::intake(&self.view()))
    }

    fn on_engine_msg(&mut self, msg: Msg) -> io::Result<()> {
        let settled_draft = match &msg {
            Msg::GenerationDone { draft_id, .. } => Some(*draft_id),
            _ => None,
        };
        let batch_done = msg == Msg::BatchFinished;
        self.dispatch(msg);

        let view = self.view();
        if let Some(row) = settled_draft.and_then(|draft_id| view.draft(draft_id)) {
            if row.state != DraftState::Generating {
                writeln!(self.out, "{}", render::draft_line(row))?;
            }
        }
        if batch_done {
            let failed = view
                .drafts
                .iter()
                .filter(|row| row.state == DraftState::Failed)
                .count();
            writeln!(
                self.out,
                "batch finished; {} failed draft(s) can be retried with 'all'",
                failed
            )?;
        }
        Ok(())
    }

    fn on_line(&mut self, line: &str) -> io::Result<Flow> {
        if self.view().confirm_clear_pending {
            if is_affirmative(line) {
                self.dispatch(Msg::ClearAllConfirmed);
                writeln!(self.out, "queue cleared")?;
            } else {
                self.dispatch(Msg::ClearAllCancelled);
                writeln!(self.out, "kept the queue")?;
            }
            return Ok(Flow::Continue);
        }

        match parse_command(line) {
            Ok(Some(command)) => self.run_command(command),
            Ok(None) => Ok(Flow::Continue),
            Err(err) => {
                writeln!(self.out, "{err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn run_command(&mut self, command: Command) -> io::Result<Flow> {
        let view = self.view();
        match command {
            Command::Add(links) => self.submit_links(links)?,
            Command::Generate(draft_id) => match view.draft(draft_id) {
                None => writeln!(self.out, "no draft #{draft_id}")?,
                Some(row) if row.state == DraftState::Generating => {
                    writeln!(self.out, "#{draft_id} is already generating")?
                }
                Some(_) => {
                    self.dispatch(Msg::GenerateClicked { draft_id });
                    writeln!(self.out, "drafting #{draft_id}...")?;
                }
            },
            Command::GenerateAll => {
                if view.batch_in_flight {
                    writeln!(self.out, "a batch is already running")?;
                } else {
                    self.dispatch(Msg::GenerateAllClicked);
                    let started = self.view().in_process_count - view.in_process_count;
                    if started == 0 {
                        writeln!(self.out, "nothing to draft")?;
                    } else {
                        writeln!(self.out, "drafting {started} replies...")?;
                    }
                }
            }
            Command::Edit(draft_id, text) => {
                if view.draft(draft_id).is_none() {
                    writeln!(self.out, "no draft #{draft_id}")?;
                } else {
                    self.dispatch(Msg::TextEdited { draft_id, text });
                    if let Some(row) = self.view().draft(draft_id) {
                        writeln!(self.out, "{}", render::draft_line(row))?;
                    }
                }
            }
            Command::Remove(draft_id) => {
                if self.dispatch(Msg::RemoveClicked { draft_id }) {
                    writeln!(self.out, "removed #{draft_id}")?;
                } else {
                    writeln!(self.out, "no draft #{draft_id}")?;
                }
            }
            Command::Clear => {
                if view.drafts.is_empty() {
                    writeln!(self.out, "queue is already empty")?;
                } else {
                    self.dispatch(Msg::ClearAllRequested);
                    writeln!(
                        self.out,
                        "discard all {} drafts? [y/N]",
                        view.draft_count
                    )?;
                }
            }
            Command::Tone(tone) => self.change_config(GenerationConfig {
                tone,
                ..view.config
            })?,
            Command::Length(length) => self.change_config(GenerationConfig {
                length,
                ..view.config
            })?,
            Command::Note(custom_instruction) => self.change_config(GenerationConfig {
                custom_instruction,
                ..view.config
            })?,
            Command::List => writeln!(self.out, "{}", render::queue(&view))?,
            Command::Links(draft_id) => match view.draft(draft_id) {
                Some(row) => writeln!(self.out, "{}", render::intents(row))?,
                None => writeln!(self.out, "no draft #{draft_id}")?,
            },
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn change_config(&mut self, config: GenerationConfig) -> io::Result<()> {
        self.dispatch(Msg::ConfigChanged(config));
        writeln!(self.out, "{}", render::config_line(&self.view().config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replydraft_core::GenerationRequest;
    use replydraft_engine::{GenerationError, Generator};

    struct EchoGenerator;

    #[async_trait::async_trait]
    impl Generator for EchoGenerator {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
            Ok(format!("\"{} take on {}\"", request.config.tone, request.source_url))
        }
    }

    fn session() -> (Session<Vec<u8>>, mpsc::Sender<LoopEvent>, mpsc::Receiver<LoopEvent>) {
        let (tx, rx) = mpsc::channel();
        let effects = EffectRunner::new(Arc::new(EchoGenerator), EngineSettings::default(), tx.clone())
            .unwrap();
        (Session::new(AppState::new(), effects, Vec::new()), tx, rx)
    }

    fn send_lines(tx: &mpsc::Sender<LoopEvent>, lines: &[&str]) {
        for line in lines {
            tx.send(LoopEvent::Line(line.to_string())).unwrap();
        }
        tx.send(LoopEvent::InputClosed).unwrap();
    }

    #[test]
    fn interactive_batch_waits_for_completions_after_eof() {
        let (mut session, tx, rx) = session();
        send_lines(
            &tx,
            &["https://x.com/u/status/5", "tone sarcastic", "all"],
        );

        session.run_interactive(&rx).unwrap();

        let out = String::from_utf8(session.out).unwrap();
        assert!(out.contains("added 1 link(s)"));
        assert!(out.contains("tone: Sarcastic  length: Medium"));
        assert!(out.contains("drafting 1 replies..."));
        assert!(out.contains("#1   completed  https://x.com/u/status/5"));
        assert!(out.contains("Sarcastic take on https://x.com/u/status/5\n"));
        assert!(out.contains("batch finished; 0 failed draft(s)"));
    }

    #[test]
    fn clear_asks_before_discarding() {
        let (mut session, tx, rx) = session();
        send_lines(
            &tx,
            &[
                "add https://x.com/a/status/1 https://x.com/b/status/2",
                "clear",
                "no",
                "clear",
                "yes",
                "list",
            ],
        );

        session.run_interactive(&rx).unwrap();

        let out = String::from_utf8(session.out).unwrap();
        assert!(out.contains("discard all 2 drafts? [y/N]"));
        assert!(out.contains("kept the queue"));
        assert!(out.contains("queue cleared"));
        assert!(out.trim_end().ends_with("queue is empty; paste some post links"));
    }

    #[test]
    fn once_mode_reports_every_draft() {
        let (mut session, _tx, rx) = session();

        session
            .run_once("https://x.com/u/status/1\nnope\nhttps://twitter.com/u/status/2\n", &rx)
            .unwrap();

        let out = String::from_utf8(session.out).unwrap();
        assert!(out.contains("added 2 link(s)"));
        assert!(out.contains("like:  https://twitter.com/intent/like?tweet_id=2"));
        assert!(out.ends_with("2 of 2 drafts completed\n"));
    }
}
