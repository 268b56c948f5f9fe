//! The engine seam.

use crate::error::Result;
use crate::network::Network;

/// A logic synthesis engine driven by textual commands.
///
/// The engine owns the current network. Commands replace or rewrite it; [`Engine::network`] exposes whatever the
/// last successful command left behind.
pub trait Engine {
    /// The engine's network representation.
    type Network: Network;

    /// Acquire the engine's resources.
    ///
    /// # Errors
    ///
    /// Fails if the engine is already started or cannot be brought up.
    fn start(&mut self) -> Result<()>;

    /// Release the engine's resources. Must be harmless on an engine that never started.
    fn stop(&mut self);

    /// Run one command, such as `read design.aig` or `resub -K 6 -l`.
    ///
    /// # Errors
    ///
    /// Fails with the engine's diagnostic if the command is rejected or does not complete.
    fn execute(&mut self, command: &str) -> Result<()>;

    /// The current network, if a design has been read.
    fn network(&self) -> Option<&Self::Network>;
}
