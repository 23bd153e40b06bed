//! The poll runtime: a command/interval actor driving one controller.
//!
//! All controller mutation happens inside the task's select loop, so each
//! applied response is one synchronous step: commands, poll ticks, and
//! cancellation never interleave mid-mutation. The host talks to the task
//! through a [`LogViewHandle`]; `disconnect()` stops polling and tears
//! the task down.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use arrdeck_logs::LevelSelection;

use crate::controller::{LogViewController, PollOutcome, RenderPlan};
use crate::settings::{refresh_interval_or_default, SettingsProvider};

/// Commands the host UI posts to the view task.
#[derive(Debug)]
pub enum ViewCommand {
    AppChange(String),
    LevelChange(LevelSelection),
    Goto(usize),
    SetPageSize(usize),
    Search(String),
    ClearSearch,
    /// Request a fresh render plan.
    Render(oneshot::Sender<RenderPlan>),
}

/// Handle to a spawned log view task.
pub struct LogViewHandle {
    tx: mpsc::Sender<ViewCommand>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl LogViewHandle {
    pub async fn handle_app_change(&self, app: impl Into<String>) {
        self.send(ViewCommand::AppChange(app.into())).await;
    }

    pub async fn handle_level_change(&self, selection: LevelSelection) {
        self.send(ViewCommand::LevelChange(selection)).await;
    }

    pub async fn goto(&self, page: usize) {
        self.send(ViewCommand::Goto(page)).await;
    }

    pub async fn set_page_size(&self, size: usize) {
        self.send(ViewCommand::SetPageSize(size)).await;
    }

    pub async fn search(&self, text: impl Into<String>) {
        self.send(ViewCommand::Search(text.into())).await;
    }

    pub async fn clear_search(&self) {
        self.send(ViewCommand::ClearSearch).await;
    }

    /// Fetch the current render plan. `None` when the task is gone.
    pub async fn render(&self) -> Option<RenderPlan> {
        let (reply, rx) = oneshot::channel();
        self.send(ViewCommand::Render(reply)).await;
        rx.await.ok()
    }

    /// Stop polling and shut the view task down.
    pub async fn disconnect(self) {
        self.cancel.cancel();
        if self.task.await.is_err() {
            tracing::warn!("log view task ended abnormally");
        }
    }

    async fn send(&self, command: ViewCommand) {
        if self.tx.send(command).await.is_err() {
            tracing::warn!("log view task is gone; command dropped");
        }
    }
}

/// Spawn with the poll interval supplied by the settings collaborator,
/// falling back to the default when it cannot answer.
pub async fn spawn_view_with_settings(
    controller: LogViewController,
    settings: &dyn SettingsProvider,
) -> LogViewHandle {
    let poll_interval = refresh_interval_or_default(settings).await;
    spawn_view(controller, poll_interval)
}

/// Spawn the view task: runs the initial fetch, then serves commands and
/// polls on `poll_interval` while the controller sits on page 1.
#[must_use]
pub fn spawn_view(controller: LogViewController, poll_interval: Duration) -> LogViewHandle {
    let (tx, rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(run_view(controller, rx, poll_interval, cancel.clone()));
    LogViewHandle { tx, cancel, task }
}

async fn run_view(
    mut controller: LogViewController,
    mut rx: mpsc::Receiver<ViewCommand>,
    poll_interval: Duration,
    cancel: CancellationToken,
) {
    if let Err(err) = controller.init().await {
        tracing::warn!(%err, "initial log fetch failed");
    }

    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires immediately; init already fetched.
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            command = rx.recv() => match command {
                Some(command) => handle_command(&mut controller, command).await,
                None => break,
            },
            _ = ticker.tick() => {
                match controller.poll_once().await {
                    PollOutcome::Failed(err) => {
                        tracing::warn!(%err, "poll failed; keeping last window");
                    }
                    PollOutcome::Merged { inserted } if inserted > 0 => {
                        tracing::debug!(inserted, "poll merged new records");
                    }
                    _ => {}
                }
            }
        }
    }

    controller.on_disconnect();
}

async fn handle_command(controller: &mut LogViewController, command: ViewCommand) {
    let outcome = match command {
        ViewCommand::AppChange(app) => controller.handle_app_change(app).await,
        ViewCommand::LevelChange(selection) => controller.handle_level_change(selection).await,
        ViewCommand::Goto(page) => controller.goto(page).await,
        ViewCommand::SetPageSize(size) => controller.set_page_size(size).await,
        ViewCommand::Search(text) => {
            controller.search(text);
            Ok(())
        }
        ViewCommand::ClearSearch => {
            controller.clear_search();
            Ok(())
        }
        ViewCommand::Render(reply) => {
            let _ = reply.send(controller.render_plan());
            Ok(())
        }
    };
    if let Err(err) = outcome {
        // Bounds rejections and fetch failures are already reflected in
        // controller state; the log line is for operators.
        tracing::warn!(%err, "view command failed");
    }
}
