//! Error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::network::ObjectKind;

/// A network that cannot be turned into a snapshot.
///
/// These mean the engine handed back something inconsistent; no snapshot is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// The object has a type that has no node role.
    #[error("unexpected node type {kind} at object {index}")]
    UnknownNodeType {
        /// Object index.
        index: usize,
        /// The offending object type.
        kind: ObjectKind,
    },
    /// A primary output without exactly one fanin.
    #[error("PO node {index} has {fanins} fanins")]
    MalformedOutputNode {
        /// Object index.
        index: usize,
        /// Number of fanins reported by the engine.
        fanins: usize,
    },
    /// An AND gate without exactly two fanins.
    #[error("AND node {index} has {fanins} fanins")]
    MalformedAndNode {
        /// Object index.
        index: usize,
        /// Number of fanins reported by the engine.
        fanins: usize,
    },
    /// An adjacency entry pointing outside the network.
    #[error("node {index} references node {target}, but the network has {count} nodes")]
    DanglingIndex {
        /// Referencing node.
        index: usize,
        /// Referenced node.
        target: usize,
        /// Number of nodes in the network.
        count: usize,
    },
}

/// Errors returned by engines and sessions.
#[derive(Error, Debug)]
pub enum Error {
    /// `start` on an engine or session that is already running.
    #[error("the engine is already started")]
    AlreadyStarted,
    /// A command was issued to an engine that is not running.
    #[error("the engine is not started")]
    NotStarted,
    /// Reading a design failed.
    #[error("cannot read design {}: {source}", path.display())]
    LoadFailed {
        /// The design path.
        path: PathBuf,
        /// Why the engine refused it.
        #[source]
        source: Box<Error>,
    },
    /// The engine rejected or failed to run a command.
    #[error("cannot execute command \"{command}\": {reason}")]
    CommandFailed {
        /// The command line.
        command: String,
        /// Engine diagnostic.
        reason: String,
    },
    /// A step of a multi-command recipe failed; the remaining steps were skipped.
    #[error("recipe step {step} failed")]
    RecipeFailed {
        /// Zero-based step number.
        step: usize,
        /// The step's failure.
        #[source]
        source: Box<Error>,
    },
    /// A command that needs a network ran before any design was read.
    #[error("no network is loaded")]
    NoNetwork,
    /// The engine network could not be snapshotted.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    /// Malformed AIGER input.
    #[error("AIGER: {0}")]
    Aiger(String),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine and session operations.
pub type Result<T> = std::result::Result<T, Error>;
