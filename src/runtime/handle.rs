//! Command loop owning a [`RecordGridController`] and the cloneable handle
//! that talks to it.

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::{
    controller::{BulkReport, RecordGridController},
    core::store::StoreSnapshot,
    error::GridError,
    event::GridEvent,
    record::{Record, RecordDraft, RecordPatch, Value},
    types::{FilterMode, RecordId},
    view::PageView,
};

/// Failure of a request sent through a [`GridHandle`].
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The controller rejected the operation.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// The writer task has shut down.
    #[error("grid runtime channel closed")]
    ChannelClosed,
}

/// Channel sizing for [`spawn_grid`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Capacity of the command queue.
    pub command_queue_bound: usize,
    /// Capacity of the event broadcast ring.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_queue_bound: 256,
            event_capacity: 1024,
        }
    }
}

type Job = Box<dyn FnOnce(&mut RecordGridController) + Send>;

/// Cloneable front end of a grid owned by a single tokio task.
pub struct GridHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<GridEvent>,
}

impl Clone for GridHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    AddRecord {
        draft: RecordDraft,
        resp: oneshot::Sender<Result<RecordId, GridError>>,
    },
    SoftDelete {
        id: RecordId,
        resp: oneshot::Sender<Result<bool, GridError>>,
    },
    Restore {
        id: RecordId,
        resp: oneshot::Sender<Result<bool, GridError>>,
    },
    HardDelete {
        id: RecordId,
        resp: oneshot::Sender<Result<Record, GridError>>,
    },
    BulkSoftDelete {
        ids: Option<Vec<RecordId>>,
        resp: oneshot::Sender<BulkReport>,
    },
    StartEdit {
        id: RecordId,
        resp: oneshot::Sender<Result<(), GridError>>,
    },
    UpdateField {
        name: String,
        value: Value,
        resp: oneshot::Sender<Result<(), GridError>>,
    },
    CommitEdit {
        resp: oneshot::Sender<Result<RecordPatch, GridError>>,
    },
    CancelEdit {
        resp: oneshot::Sender<bool>,
    },
    ToggleSelect {
        id: RecordId,
        resp: oneshot::Sender<Result<bool, GridError>>,
    },
    SetFilter {
        mode: FilterMode,
        resp: oneshot::Sender<bool>,
    },
    SetSearch {
        term: String,
        resp: oneshot::Sender<bool>,
    },
    GoToPage {
        page: usize,
        resp: oneshot::Sender<bool>,
    },
    SetPageSize {
        page_size: usize,
        resp: oneshot::Sender<bool>,
    },
    PageView {
        resp: oneshot::Sender<PageView>,
    },
    Snapshot {
        resp: oneshot::Sender<StoreSnapshot>,
    },
    Run {
        job: Job,
    },
    Shutdown {
        resp: oneshot::Sender<Vec<Record>>,
    },
}

/// Moves `grid` into a task that applies commands one at a time.
///
/// Events queued by each command are broadcast after it completes.
pub fn spawn_grid(grid: RecordGridController, config: RuntimeConfig) -> GridHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(config.command_queue_bound.max(1));
    let (events_tx, _) = broadcast::channel::<GridEvent>(config.event_capacity.max(1));
    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut grid = grid;
        while let Some(cmd) = cmd_rx.recv().await {
            let shutdown = match cmd {
                Command::Shutdown { resp } => Some(resp),
                cmd => {
                    handle_command(cmd, &mut grid);
                    None
                }
            };

            for event in grid.drain_events() {
                let _ = events_tx_loop.send(event);
            }

            if let Some(resp) = shutdown {
                tracing::debug!("grid runtime shutting down");
                let _ = resp.send(grid.into_records());
                return;
            }
        }
    });

    GridHandle { cmd_tx, events_tx }
}

fn handle_command(cmd: Command, grid: &mut RecordGridController) {
    match cmd {
        Command::AddRecord { draft, resp } => {
            let _ = resp.send(grid.add_record(draft));
        }
        Command::SoftDelete { id, resp } => {
            let _ = resp.send(grid.soft_delete(id));
        }
        Command::Restore { id, resp } => {
            let _ = resp.send(grid.restore(id));
        }
        Command::HardDelete { id, resp } => {
            let _ = resp.send(grid.hard_delete(id));
        }
        Command::BulkSoftDelete { ids, resp } => {
            let report = match ids {
                Some(ids) => grid.bulk_soft_delete(&ids),
                None => grid.bulk_soft_delete_selected(),
            };
            let _ = resp.send(report);
        }
        Command::StartEdit { id, resp } => {
            let _ = resp.send(grid.start_edit(id));
        }
        Command::UpdateField { name, value, resp } => {
            let _ = resp.send(grid.update_edit_field(&name, value));
        }
        Command::CommitEdit { resp } => {
            let _ = resp.send(grid.commit_edit());
        }
        Command::CancelEdit { resp } => {
            let _ = resp.send(grid.cancel_edit());
        }
        Command::ToggleSelect { id, resp } => {
            let _ = resp.send(grid.toggle_select(id));
        }
        Command::SetFilter { mode, resp } => {
            let _ = resp.send(grid.set_filter_mode(mode));
        }
        Command::SetSearch { term, resp } => {
            let _ = resp.send(grid.set_search(&term));
        }
        Command::GoToPage { page, resp } => {
            let _ = resp.send(grid.go_to_page(page));
        }
        Command::SetPageSize { page_size, resp } => {
            let _ = resp.send(grid.set_page_size(page_size));
        }
        Command::PageView { resp } => {
            let _ = resp.send(grid.page_view());
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(grid.export_snapshot());
        }
        Command::Run { job } => job(grid),
        Command::Shutdown { .. } => {}
    }
}

impl GridHandle {
    /// New receiver for events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<GridEvent> {
        self.events_tx.subscribe()
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(make(tx))
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// See [`RecordGridController::add_record`].
    pub async fn add_record(&self, draft: RecordDraft) -> Result<RecordId, RuntimeError> {
        Ok(self
            .request(|resp| Command::AddRecord { draft, resp })
            .await??)
    }

    /// See [`RecordGridController::soft_delete`].
    pub async fn soft_delete(&self, id: RecordId) -> Result<bool, RuntimeError> {
        Ok(self.request(|resp| Command::SoftDelete { id, resp }).await??)
    }

    /// See [`RecordGridController::restore`].
    pub async fn restore(&self, id: RecordId) -> Result<bool, RuntimeError> {
        Ok(self.request(|resp| Command::Restore { id, resp }).await??)
    }

    /// See [`RecordGridController::hard_delete`].
    pub async fn hard_delete(&self, id: RecordId) -> Result<Record, RuntimeError> {
        Ok(self.request(|resp| Command::HardDelete { id, resp }).await??)
    }

    /// Soft-deletes `ids`, or the current selection when `None`.
    pub async fn bulk_soft_delete(
        &self,
        ids: Option<Vec<RecordId>>,
    ) -> Result<BulkReport, RuntimeError> {
        self.request(|resp| Command::BulkSoftDelete { ids, resp })
            .await
    }

    /// See [`RecordGridController::start_edit`].
    pub async fn start_edit(&self, id: RecordId) -> Result<(), RuntimeError> {
        Ok(self.request(|resp| Command::StartEdit { id, resp }).await??)
    }

    /// See [`RecordGridController::update_edit_field`].
    pub async fn update_edit_field(
        &self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), RuntimeError> {
        let name = name.into();
        let value = value.into();
        Ok(self
            .request(|resp| Command::UpdateField { name, value, resp })
            .await??)
    }

    /// See [`RecordGridController::commit_edit`].
    pub async fn commit_edit(&self) -> Result<RecordPatch, RuntimeError> {
        Ok(self.request(|resp| Command::CommitEdit { resp }).await??)
    }

    /// See [`RecordGridController::cancel_edit`].
    pub async fn cancel_edit(&self) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::CancelEdit { resp }).await
    }

    /// See [`RecordGridController::toggle_select`].
    pub async fn toggle_select(&self, id: RecordId) -> Result<bool, RuntimeError> {
        Ok(self
            .request(|resp| Command::ToggleSelect { id, resp })
            .await??)
    }

    /// See [`RecordGridController::set_filter_mode`].
    pub async fn set_filter_mode(&self, mode: FilterMode) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::SetFilter { mode, resp }).await
    }

    /// See [`RecordGridController::set_search`].
    pub async fn set_search(&self, term: impl Into<String>) -> Result<bool, RuntimeError> {
        let term = term.into();
        self.request(|resp| Command::SetSearch { term, resp }).await
    }

    /// See [`RecordGridController::go_to_page`].
    pub async fn go_to_page(&self, page: usize) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::GoToPage { page, resp }).await
    }

    /// See [`RecordGridController::set_page_size`].
    pub async fn set_page_size(&self, page_size: usize) -> Result<bool, RuntimeError> {
        self.request(|resp| Command::SetPageSize { page_size, resp })
            .await
    }

    /// See [`RecordGridController::page_view`].
    pub async fn page_view(&self) -> Result<PageView, RuntimeError> {
        self.request(|resp| Command::PageView { resp }).await
    }

    /// Copy of the backing records.
    pub async fn snapshot(&self) -> Result<StoreSnapshot, RuntimeError> {
        self.request(|resp| Command::Snapshot { resp }).await
    }

    /// Runs `f` against the grid inside the writer task.
    pub async fn with_grid<R, F>(&self, f: F) -> Result<R, RuntimeError>
    where
        R: Send + 'static,
        F: FnOnce(&mut RecordGridController) -> R + Send + 'static,
    {
        self.request(|tx| Command::Run {
            job: Box::new(move |grid: &mut RecordGridController| {
                let _ = tx.send(f(grid));
            }),
        })
        .await
    }

    /// Stops the writer task and returns the final records.
    pub async fn shutdown(&self) -> Result<Vec<Record>, RuntimeError> {
        self.request(|resp| Command::Shutdown { resp }).await
    }
}
