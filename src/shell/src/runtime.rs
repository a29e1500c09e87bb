use anyhow::{Context, Result};
use crux_core::{Core, Request};
use crux_http::protocol::{HttpRequest, HttpResult};
use esp32_panel_core::{App, Effect, Event, Model, TimerId, TimerOperation, TimerOutput};
use log::{debug, error, info, warn};
use reqwest::Client;
use std::{collections::HashMap, io::Write, time::Duration};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::{mpsc, oneshot},
};

use crate::{
    http_client,
    input::{Input, HELP},
    render::Renderer,
};

/// Result of a spawned effect, delivered back to the runtime loop
#[derive(Debug)]
enum Completion {
    Http { key: u64, result: HttpResult },
    Timer { id: TimerId, output: TimerOutput },
}

struct PendingTimer {
    request: Request<TimerOperation>,
    cancel: Option<oneshot::Sender<()>>,
}

enum Wake {
    Completion(Option<Completion>),
    Line(std::io::Result<Option<String>>),
    Interrupt,
}

/// Terminal shell executing the effects requested by the core
///
/// All core access happens on the runtime loop; HTTP requests and timers run
/// as tasks and report back through a channel.
pub struct Shell {
    core: Core<App>,
    client: Client,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    next_key: u64,
    pending_http: HashMap<u64, Request<HttpRequest>>,
    timers: HashMap<TimerId, PendingTimer>,
    renderer: Renderer,
    output: Box<dyn Write + Send>,
}

impl Shell {
    pub fn new(client: Client, output: Box<dyn Write + Send>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            core: Core::new(),
            client,
            tx,
            rx,
            next_key: 0,
            pending_http: HashMap::new(),
            timers: HashMap::new(),
            renderer: Renderer::default(),
            output,
        }
    }

    /// Current view model
    pub fn view(&self) -> Model {
        self.core.view()
    }

    /// Number of effects still waiting for a result
    pub fn pending(&self) -> usize {
        self.pending_http.len() + self.timers.len()
    }

    /// Send an event to the core and start the effects it requests
    pub fn dispatch(&mut self, event: Event) {
        debug!("dispatching {event:?}");
        let effects = self.core.process_event(event);
        self.process_effects(effects);
    }

    /// Wait for the next effect to complete and feed its result to the core
    pub async fn step(&mut self) -> Result<()> {
        let completion = self
            .rx
            .recv()
            .await
            .context("effect channel closed")?;
        self.complete(completion);
        Ok(())
    }

    /// Run until stdin closes, `quit` is entered or the process is interrupted
    pub async fn run(&mut self) -> Result<()> {
        self.print(HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            let wake = tokio::select! {
                completion = self.rx.recv() => Wake::Completion(completion),
                line = lines.next_line() => Wake::Line(line),
                _ = &mut ctrl_c => Wake::Interrupt,
            };

            match wake {
                Wake::Completion(Some(completion)) => self.complete(completion),
                Wake::Completion(None) => anyhow::bail!("effect channel closed"),
                Wake::Line(line) => match line.context("failed to read stdin")? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => {
                        if !self.handle_line(&line) {
                            break;
                        }
                    }
                    None => {
                        info!("stdin closed");
                        break;
                    }
                },
                Wake::Interrupt => {
                    info!("interrupted");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Returns `false` when the user asked to quit
    fn handle_line(&mut self, line: &str) -> bool {
        match line.parse::<Input>() {
            Ok(Input::Event(event)) => self.dispatch(event),
            Ok(Input::Help) => self.print(HELP),
            Ok(Input::Quit) => return false,
            Err(e) => self.print(&format!("{e:#}\n{HELP}")),
        }
        true
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Http { key, result } => match self.pending_http.remove(&key) {
                Some(mut request) => {
                    let effects = self.core.resolve(&mut request, result);
                    self.resolved(effects);
                }
                None => warn!("no pending request for key {key}"),
            },
            Completion::Timer { id, output } => match self.timers.remove(&id) {
                Some(mut pending) => {
                    let effects = self.core.resolve(&mut pending.request, output);
                    self.resolved(effects);
                }
                None => warn!("no pending {id}"),
            },
        }
    }

    fn resolved<E: std::fmt::Display>(&mut self, effects: Result<Vec<Effect>, E>) {
        match effects {
            Ok(effects) => self.process_effects(effects),
            Err(e) => error!("failed to resolve effect: {e}"),
        }
    }

    fn process_effects(&mut self, effects: Vec<Effect>) {
        let mut queue = effects;

        while let Some(effect) = queue.pop() {
            match effect {
                Effect::Render(_) => self.render(),
                Effect::Http(request) => self.spawn_http(request),
                Effect::Timer(request) => {
                    if let Some(more) = self.handle_timer(request) {
                        queue.extend(more);
                    }
                }
            }
        }
    }

    fn render(&mut self) {
        let model = self.core.view();
        if let Some(text) = self.renderer.render(&model) {
            let text = text.to_string();
            self.print(&text);
        }
    }

    fn print(&mut self, text: &str) {
        if let Err(e) = writeln!(self.output, "{text}\n") {
            warn!("failed to write panel: {e}");
        }
    }

    fn spawn_http(&mut self, request: Request<HttpRequest>) {
        self.next_key += 1;
        let key = self.next_key;
        let operation = request.operation.clone();
        self.pending_http.insert(key, request);

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = http_client::execute(&client, &operation).await;
            // the receiver only goes away on shutdown
            let _ = tx.send(Completion::Http { key, result });
        });
    }

    /// Start or cancel a timer; a cancel resolves at once and may yield new effects
    fn handle_timer(&mut self, mut request: Request<TimerOperation>) -> Option<Vec<Effect>> {
        match request.operation.clone() {
            TimerOperation::Start { id, millis } => {
                let (cancel_tx, cancel_rx) = oneshot::channel();
                self.timers.insert(
                    id,
                    PendingTimer {
                        request,
                        cancel: Some(cancel_tx),
                    },
                );

                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let output = tokio::select! {
                        _ = tokio::time::sleep(Duration::from_millis(millis)) => TimerOutput::Elapsed { id },
                        _ = cancel_rx => TimerOutput::Cancelled { id },
                    };
                    let _ = tx.send(Completion::Timer { id, output });
                });
                None
            }
            TimerOperation::Cancel { id } => {
                match self.timers.get_mut(&id).and_then(|t| t.cancel.take()) {
                    Some(cancel) => {
                        let _ = cancel.send(());
                    }
                    None => debug!("{id} already finished"),
                }

                match self
                    .core
                    .resolve(&mut request, TimerOutput::Cancelled { id })
                {
                    Ok(effects) => Some(effects),
                    Err(e) => {
                        error!("failed to resolve cancel of {id}: {e}");
                        None
                    }
                }
            }
        }
    }
}
