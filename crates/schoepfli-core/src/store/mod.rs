//! Remote store contracts consumed by the coordinators and the live
//! projection.
//!
//! The backend is an external collaborator: one singleton alarm document,
//! one reaction collection, one read-only user directory. Writes are
//! last-writer-wins at the storage layer; no optimistic-concurrency guard
//! is exposed here.

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::model::{AlarmRecord, Reaction, UserRef};

pub use memory::MemoryStore;

/// Failure surface of the remote document store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("read failed: {0}")]
    Read(String),

    #[error("write failed: {0}")]
    Write(String),

    #[error("observation stream failed: {0}")]
    Stream(String),
}

/// Mutation applied inside the `update_alarm` transaction.
pub type AlarmMutation = Box<dyn FnOnce(AlarmRecord) -> AlarmRecord + Send>;

/// Document and collection operations of the alarm backend.
///
/// The `observe_*` methods return long-lived update streams: the current
/// value is emitted first, then every subsequent change, until the
/// receiver is dropped.
#[async_trait]
pub trait AlarmStore: Send + Sync {
    async fn observe_alarm(&self) -> mpsc::Receiver<Result<Option<AlarmRecord>, RemoteError>>;

    async fn observe_reactions(&self) -> mpsc::Receiver<Result<Vec<Reaction>, RemoteError>>;

    /// Read the singleton alarm document; `None` means no broadcast was
    /// ever written.
    async fn read_alarm_once(&self) -> Result<Option<AlarmRecord>, RemoteError>;

    async fn read_reactions_once(&self) -> Result<Vec<Reaction>, RemoteError>;

    /// Transactional read-modify-write of the singleton alarm document.
    /// With `force_new_timestamp`, both timestamps are stamped fresh even
    /// when the mutated document is otherwise unchanged.
    async fn update_alarm(
        &self,
        force_new_timestamp: bool,
        mutate: AlarmMutation,
    ) -> Result<(), RemoteError>;

    /// Destroy the entire reaction collection (new-epoch clean slate).
    async fn delete_all_reactions(&self) -> Result<(), RemoteError>;

    async fn insert_reaction(&self, reaction: Reaction) -> Result<(), RemoteError>;
}

/// Read-only user directory used to resolve display names.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn observe_users(&self) -> mpsc::Receiver<Result<Vec<UserRef>, RemoteError>>;
}
