//! Terminal User Interface for the sandbox.
//!
//! Provides the main TUI application loop using ratatui and crossterm.
//! Gateway calls run on background tasks and report back over a channel so
//! the UI keeps redrawing while they are in flight.

pub mod app;
mod events;
mod ui;
pub mod widgets;

pub use app::{Action, App};
pub use events::Event;

use crate::config::SandboxConfig;
use crate::db::QueryResult;
use crate::error::{Result, SandboxError};
use crate::sandbox::{GatewayApi, GatewayClient, ReferenceData};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Messages sent from background tasks to the main loop.
#[derive(Debug)]
pub enum AsyncMessage {
    /// A reference data load completed.
    ReferenceLoaded(ReferenceData),
    /// An editor query completed.
    QueryFinished(Result<QueryResult>),
    /// A test run completed with one verdict per case.
    TestsFinished { generation: u64, verdicts: Vec<bool> },
}

/// Spawns gateway work and applies its results to the app.
pub struct Dispatcher {
    api: Arc<dyn GatewayApi>,
    tx: mpsc::Sender<AsyncMessage>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn GatewayApi>, tx: mpsc::Sender<AsyncMessage>) -> Self {
        Self { api, tx }
    }

    /// Starts the work an action asks for.
    pub fn dispatch(&self, action: Action, app: &mut App) {
        match action {
            Action::None => {}
            Action::Execute(query) => self.execute(query, app),
            Action::RunTests => self.run_tests(app),
            Action::Reload => self.reload(app),
        }
    }

    /// Applies a completed background result.
    ///
    /// A successful editor query refreshes the reference data and reruns the
    /// test cases.
    pub fn handle_message(&self, msg: AsyncMessage, app: &mut App) {
        match msg {
            AsyncMessage::ReferenceLoaded(data) => app.finish_reference(data),
            AsyncMessage::QueryFinished(outcome) => {
                if app.finish_query(outcome) {
                    self.reload(app);
                    self.run_tests(app);
                }
            }
            AsyncMessage::TestsFinished {
                generation,
                verdicts,
            } => {
                if !app.finish_tests(generation, &verdicts) {
                    debug!("Discarding superseded test run {}", generation);
                }
            }
        }
    }

    fn execute(&self, query: String, app: &mut App) {
        debug!("Executing editor query");
        app.begin_request();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = api.execute_query(&query).await;
            let _ = tx.send(AsyncMessage::QueryFinished(outcome)).await;
        });
    }

    fn run_tests(&self, app: &mut App) {
        let generation = app.begin_test_run();
        let suite = app.suite.clone();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let verdicts = suite.evaluate(api.as_ref()).await;
            let _ = tx
                .send(AsyncMessage::TestsFinished {
                    generation,
                    verdicts,
                })
                .await;
        });
    }

    fn reload(&self, app: &mut App) {
        app.begin_request();
        let table = app.reference_table.clone();
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let data = ReferenceData::load(api.as_ref(), &table).await;
            let _ = tx.send(AsyncMessage::ReferenceLoaded(data)).await;
        });
    }
}

/// The main TUI application runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        Ok(Self { terminal })
    }

    /// Sets up the terminal for TUI rendering.
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| SandboxError::internal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|e| {
            SandboxError::internal(format!("Failed to enter alternate screen: {e}"))
        })?;

        Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| SandboxError::internal(format!("Failed to create terminal: {e}")))
    }

    /// Restores the terminal to its original state.
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| SandboxError::internal(format!("Failed to disable raw mode: {e}")))?;

        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .map_err(|e| SandboxError::internal(format!("Failed to leave alternate screen: {e}")))?;

        self.terminal
            .show_cursor()
            .map_err(|e| SandboxError::internal(format!("Failed to show cursor: {e}")))?;

        Ok(())
    }

    /// Runs the event loop against the given gateway until the user quits.
    pub async fn run(&mut self, mut app: App, api: Arc<dyn GatewayApi>) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let (tx, mut rx) = mpsc::channel::<AsyncMessage>(32);
        let dispatcher = Dispatcher::new(api, tx);

        // Initial load: reference data, all test cases unchecked.
        app.suite.reset();
        dispatcher.dispatch(Action::Reload, &mut app);

        let (event_tx, mut event_rx) = mpsc::channel::<Event>(64);
        events::spawn_reader(event_tx);

        let result = self
            .run_event_loop(&mut app, &dispatcher, &mut event_rx, &mut rx)
            .await;

        let _ = panic::take_hook();
        result
    }

    async fn run_event_loop(
        &mut self,
        app: &mut App,
        dispatcher: &Dispatcher,
        input: &mut mpsc::Receiver<Event>,
        rx: &mut mpsc::Receiver<AsyncMessage>,
    ) -> Result<()> {
        loop {
            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| SandboxError::internal(format!("Failed to draw: {e}")))?;

            if !app.running {
                break;
            }

            tokio::select! {
                Some(event) = input.recv() => {
                    let action = app.handle_event(event);
                    dispatcher.dispatch(action, app);
                }

                Some(msg) = rx.recv() => {
                    dispatcher.handle_message(msg, app);
                }

                else => break,
            }
        }

        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the sandbox UI against the configured gateway.
pub async fn run(config: &SandboxConfig) -> Result<()> {
    let client = GatewayClient::new(config.gateway_url())?;
    info!("Using gateway at {}", client.base_url());

    let app = App::new(client.base_url(), config.reference_table());
    let api: Arc<dyn GatewayApi> = Arc::new(client);

    let mut tui = Tui::new()?;
    let result = tui.run(app, api).await;
    if let Err(e) = &result {
        warn!("UI exited with error: {}", e);
    }
    result
}
