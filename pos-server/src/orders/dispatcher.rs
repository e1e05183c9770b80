//! CommandDispatcher - fire-and-forget command queue
//!
//! The UI submits [`TableCommand`]s without waiting for them. A single worker
//! task applies them in submission order; successful commands are silent
//! (their effect arrives through the live feeds) and failures are published
//! as [`Notice::Failed`] for the UI to alert on.
//!
//! Destructive commands (delete table, close order, replace menu) pass
//! through a [`Confirmer`] before they are queued. A declined command never
//! reaches the worker and produces no notice.

use super::cart::CartGroup;
use super::manager::OrdersManager;
use crate::data_transfer;
use shared::error::AppError;
use shared::models::{MenuItem, PaymentMethod};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Pending command queue size
const COMMAND_QUEUE_CAPACITY: usize = 256;
/// Failure notice channel size
const NOTICE_CHANNEL_CAPACITY: usize = 64;

/// Mutation requested by the UI
#[derive(Debug, Clone, PartialEq)]
pub enum TableCommand {
    CreateTable {
        name: String,
    },
    DeleteTable {
        table_id: String,
    },
    AddItem {
        table_id: String,
        menu_item: MenuItem,
        /// Already-resolved price for variable-price items
        override_price: Option<f64>,
    },
    RemoveItem {
        table_id: String,
        instance_id: String,
    },
    RemoveOne {
        table_id: String,
        group: CartGroup,
    },
    SetPaymentMethod {
        table_id: String,
        method: PaymentMethod,
    },
    CloseOrder {
        table_id: String,
    },
    ReplaceMenu {
        items: Vec<MenuItem>,
    },
}

impl TableCommand {
    /// Whether the user must confirm before the command runs
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::DeleteTable { .. } | Self::CloseOrder { .. } | Self::ReplaceMenu { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateTable { .. } => "create_table",
            Self::DeleteTable { .. } => "delete_table",
            Self::AddItem { .. } => "add_item",
            Self::RemoveItem { .. } => "remove_item",
            Self::RemoveOne { .. } => "remove_one",
            Self::SetPaymentMethod { .. } => "set_payment_method",
            Self::CloseOrder { .. } => "close_order",
            Self::ReplaceMenu { .. } => "replace_menu",
        }
    }
}

/// Asks the user to confirm a destructive command
pub trait Confirmer: Send + Sync {
    fn confirm(&self, command: &TableCommand) -> bool;
}

/// Confirms everything (headless use and tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl Confirmer for AlwaysConfirm {
    fn confirm(&self, _command: &TableCommand) -> bool {
        true
    }
}

/// Terminal outcome worth telling the user about
#[derive(Debug, Clone)]
pub enum Notice {
    Failed {
        command: TableCommand,
        error: AppError,
    },
}

/// What happened to a submitted command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Queued,
    /// The user declined the confirmation
    Declined,
}

/// Why a command could not be queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("command worker is not running")]
    Closed,
    #[error("command queue is full")]
    Full,
}

/// Handle for submitting commands
///
/// Dropping every handle closes the queue; the worker drains what is left
/// and exits.
#[derive(Clone)]
pub struct CommandDispatcher {
    tx: mpsc::Sender<TableCommand>,
    notices: broadcast::Sender<Notice>,
    confirmer: Arc<dyn Confirmer>,
}

impl std::fmt::Debug for CommandDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDispatcher")
            .field("queued", &(COMMAND_QUEUE_CAPACITY - self.tx.capacity()))
            .finish()
    }
}

impl CommandDispatcher {
    /// Start the worker task
    pub fn spawn(
        manager: Arc<OrdersManager>,
        confirmer: Arc<dyn Confirmer>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let (notices, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);

        let worker = CommandWorker {
            manager,
            notices: notices.clone(),
        };
        let handle = tokio::spawn(worker.run(rx));

        (
            Self {
                tx,
                notices,
                confirmer,
            },
            handle,
        )
    }

    fn confirmed(&self, command: &TableCommand) -> bool {
        if command.is_destructive() && !self.confirmer.confirm(command) {
            tracing::debug!(command = command.name(), "Command declined by user");
            return false;
        }
        true
    }

    /// Queue a command, waiting only if the queue is full
    pub async fn submit(&self, command: TableCommand) -> Result<Submitted, SubmitError> {
        if !self.confirmed(&command) {
            return Ok(Submitted::Declined);
        }
        self.tx.send(command).await.map_err(|_| SubmitError::Closed)?;
        Ok(Submitted::Queued)
    }

    /// Queue a command from synchronous code
    pub fn try_submit(&self, command: TableCommand) -> Result<Submitted, SubmitError> {
        if !self.confirmed(&command) {
            return Ok(Submitted::Declined);
        }
        match self.tx.try_send(command) {
            Ok(()) => Ok(Submitted::Queued),
            Err(mpsc::error::TrySendError::Full(command)) => {
                tracing::warn!(command = command.name(), "Command queue full, dropping command");
                Err(SubmitError::Full)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(SubmitError::Closed),
        }
    }

    /// Receive failure notices from now on
    pub fn subscribe_notices(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }
}

struct CommandWorker {
    manager: Arc<OrdersManager>,
    notices: broadcast::Sender<Notice>,
}

impl CommandWorker {
    async fn run(self, mut rx: mpsc::Receiver<TableCommand>) {
        tracing::info!("Command worker started");

        while let Some(command) = rx.recv().await {
            if let Err(error) = self.execute(&command) {
                tracing::warn!(
                    command = command.name(),
                    error_code = %error.code,
                    error = %error,
                    "Command failed"
                );
                // Nobody listening is fine; the failure is already logged
                let _ = self.notices.send(Notice::Failed { command, error });
            }
        }

        tracing::info!("Command queue closed, shutting down worker");
    }

    fn execute(&self, command: &TableCommand) -> Result<(), AppError> {
        let manager = &self.manager;
        match command {
            TableCommand::CreateTable { name } => {
                manager.create_table(name)?;
            }
            TableCommand::DeleteTable { table_id } => manager.delete_table(table_id)?,
            TableCommand::AddItem {
                table_id,
                menu_item,
                override_price,
            } => {
                manager.add_item(table_id, menu_item, *override_price)?;
            }
            TableCommand::RemoveItem {
                table_id,
                instance_id,
            } => {
                manager.remove_item(table_id, instance_id)?;
            }
            TableCommand::RemoveOne { table_id, group } => {
                manager.remove_one(table_id, group)?;
            }
            TableCommand::SetPaymentMethod { table_id, method } => {
                manager.set_payment_method(table_id, *method)?;
            }
            TableCommand::CloseOrder { table_id } => {
                manager.close_order(table_id)?;
            }
            TableCommand::ReplaceMenu { items } => {
                data_transfer::replace_menu(manager.store().as_ref(), items)?;
            }
        }
        Ok(())
    }
}
