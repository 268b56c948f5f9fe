//! Snapshots of a logic synthesis engine's and-inverter graph.
//!
//! And-inverter graphs (AIGs) represent boolean logic as two-input AND gates and inverters. Inverters are not
//! gates of their own: they live on the edges, as a complement flag on each fanin. Any logic function can be
//! expressed this way, and the structure is simple enough that synthesis engines rewrite it in place, many times,
//! while optimising a design.
//!
//! That in-place rewriting makes the engine's network awkward to inspect. This crate drives an engine through a
//! [`Session`], and after loading a design (or on request) walks the engine's network once to build a
//! [`Snapshot`]: an indexed, read-only table where every node has exactly one [`NodeType`], its fanins in a
//! polarity-canonical order, and its fanouts.
//!
//! The network layout follows the engine's object numbering:
//! - object 0 is the constant one;
//! - then every primary input;
//! - then every primary output, each with exactly one fanin;
//! - then every AND node, in topological order.
//!
//! An AND node with exactly one inverted fanin always reports it as fanin 0, so a caller only has to consider
//! three kinds of AND: no inversions, the first inverted, or both inverted.
//!
//! Transformations themselves are the engine's business. The [`Frame`] engine loads AIGER files and hashes them
//! in-process, and hands other design formats, as well as `balance`, `resub`, `rewrite` and `refactor`, to an
//! external `abc` executable.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod abc;
pub mod aig;
pub mod aiger_io;
pub mod classify;
pub mod command;
pub mod engine;
pub mod error;
pub mod frame;
pub mod network;
pub mod session;
pub mod snapshot;

pub use classify::NodeType;
pub use command::{Balance, Refactor, Resub, Rewrite, Transform, COMPRESS2RS};
pub use engine::Engine;
pub use error::{Error, Result, SnapshotError};
pub use frame::{Frame, FrameConfig};
pub use network::{Network, Object, ObjectKind};
pub use session::Session;
pub use snapshot::{AigNode, AigStats, Snapshot};
