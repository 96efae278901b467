//! The data-access client handed to every business operation.
//!
//! A [`Store`] bundles the database connection, the slot write policy and a
//! change feed. It is constructed explicitly and passed by reference; there is
//! no process-wide handle. Screens that want live updates call
//! [`Store::subscribe`] when they mount and drop the returned [`Subscription`]
//! when they unmount. Each subscription is independent.

use crate::config::{AppConfig, SlotWritePolicy, database};
use crate::errors::Result;
use sea_orm::DatabaseConnection;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{info, trace, warn};

/// Buffered change events per subscriber before older ones are dropped.
const CHANGE_FEED_CAPACITY: usize = 256;

/// The document collections backing the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// `companies`
    Companies,
    /// `employees`
    Employees,
    /// `attendance`
    Attendance,
    /// `payroll`
    Payroll,
    /// `revenues`
    Revenues,
    /// `hospitals`
    Hospitals,
    /// `doctors`
    Doctors,
    /// `appointments`
    Appointments,
}

impl Collection {
    /// Collection name as stored.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::Employees => "employees",
            Self::Attendance => "attendance",
            Self::Payroll => "payroll",
            Self::Revenues => "revenues",
            Self::Hospitals => "hospitals",
            Self::Doctors => "doctors",
            Self::Appointments => "appointments",
        }
    }
}

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A new document was written
    Created,
    /// An existing document was modified or overwritten
    Updated,
    /// The document was removed
    Deleted,
}

/// Notification published after a successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Collection the document lives in
    pub collection: Collection,
    /// ID of the changed document
    pub document_id: String,
    /// Kind of change
    pub kind: ChangeKind,
}

/// Injected data-access client.
#[derive(Debug, Clone)]
pub struct Store {
    db: DatabaseConnection,
    changes: broadcast::Sender<ChangeEvent>,
    slot_write_policy: SlotWritePolicy,
}

impl Store {
    /// Wraps an open connection.
    #[must_use]
    pub fn new(db: DatabaseConnection, slot_write_policy: SlotWritePolicy) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            db,
            changes,
            slot_write_policy,
        }
    }

    /// Opens the configured database and makes sure every table exists.
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let db = database::create_connection(&config.database.url).await?;
        database::create_tables(&db).await?;
        info!(
            "Store ready (slot write policy: {:?})",
            config.booking.slot_write_policy
        );
        Ok(Self::new(db, config.booking.slot_write_policy))
    }

    /// The underlying database connection.
    #[must_use]
    pub const fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Conflict handling for writes to embedded slot lists.
    #[must_use]
    pub const fn slot_write_policy(&self) -> SlotWritePolicy {
        self.slot_write_policy
    }

    /// Starts listening for changes to one collection.
    #[must_use]
    pub fn subscribe(&self, collection: Collection) -> Subscription {
        Subscription {
            collection,
            receiver: self.changes.subscribe(),
        }
    }

    /// Number of live subscriptions across all collections.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.changes.receiver_count()
    }

    pub(crate) fn publish(&self, collection: Collection, document_id: &str, kind: ChangeKind) {
        let event = ChangeEvent {
            collection,
            document_id: document_id.to_string(),
            kind,
        };
        if self.changes.send(event).is_err() {
            trace!("No subscribers for {} change", collection.name());
        }
    }
}

/// A live subscription to one collection. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    collection: Collection,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl Subscription {
    /// Collection this subscription listens to.
    #[must_use]
    pub const fn collection(&self) -> Collection {
        self.collection
    }

    /// Waits for the next change in the subscribed collection.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if event.collection == self.collection => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        "Subscription to {} lagged, {} events skipped",
                        self.collection.name(),
                        skipped
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Returns the next already-published change without waiting.
    pub fn try_next(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if event.collection == self.collection => return Some(event),
                Ok(_) => {}
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(
                        "Subscription to {} lagged, {} events skipped",
                        self.collection.name(),
                        skipped
                    );
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Releases the subscription.
    pub fn unsubscribe(self) {
        trace!("Unsubscribed from {}", self.collection.name());
    }
}
