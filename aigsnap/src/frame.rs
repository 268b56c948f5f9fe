//! The in-process engine.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::abc;
use crate::aig::Aig;
use crate::aiger_io;
use crate::engine::Engine;
use crate::error::{Error, Result};

/// Settings for a [`Frame`].
#[derive(Clone, Debug, PartialEq)]
pub struct FrameConfig {
    /// The `abc` executable used for transformations.
    pub abc: PathBuf,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { abc: PathBuf::from("abc") }
    }
}

impl FrameConfig {
    /// Use the `abc` executable at `path`.
    #[must_use]
    pub fn with_abc(mut self, path: impl Into<PathBuf>) -> Self {
        self.abc = path.into();
        self
    }
}

/// An engine holding its network as an [`Aig`].
///
/// `read` of an AIGER file and `strash` run in-process. Other design formats are read, and every other command
/// is run, by the configured `abc` executable.
#[derive(Debug, Default)]
pub struct Frame {
    config: FrameConfig,
    work_dir: Option<TempDir>,
    network: Option<Aig>,
}

impl Frame {
    /// A stopped frame using `config`.
    #[must_use]
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            work_dir: None,
            network: None,
        }
    }

    /// The frame's settings.
    #[must_use]
    pub const fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Engine for Frame {
    type Network = Aig;

    fn start(&mut self) -> Result<()> {
        if self.work_dir.is_some() {
            return Err(Error::AlreadyStarted);
        }
        let work_dir = tempfile::Builder::new().prefix("aigsnap").tempdir()?;
        debug!(work_dir = %work_dir.path().display(), "frame started");
        self.work_dir = Some(work_dir);
        Ok(())
    }

    fn stop(&mut self) {
        self.network = None;
        if let Some(work_dir) = self.work_dir.take() {
            if let Err(e) = work_dir.close() {
                warn!("cannot remove frame work directory: {}", e);
            }
            debug!("frame stopped");
        }
    }

    fn execute(&mut self, command: &str) -> Result<()> {
        let work_dir = self.work_dir.as_ref().ok_or(Error::NotStarted)?;
        let (name, arguments) = match command.trim().find(char::is_whitespace) {
            Some(split) => command.trim().split_at(split),
            None => (command.trim(), ""),
        };

        let network = match name {
            "read" => {
                let path = Path::new(arguments.trim());
                let failed = |reason: String| Error::CommandFailed {
                    command: command.to_string(),
                    reason,
                };
                let contents = std::fs::read(path).map_err(|e| failed(e.to_string()))?;
                if aiger_io::is_aiger(&contents) {
                    aiger_io::from_bytes(&contents).map_err(|e| failed(e.to_string()))?
                } else {
                    debug!(path = %path.display(), "not AIGER, reading through abc");
                    abc::import(&self.config.abc, work_dir.path(), path, command.trim())?
                }
            }
            "strash" => self.network.as_ref().ok_or(Error::NoNetwork)?.strash(),
            _ => {
                let network = self.network.as_ref().ok_or(Error::NoNetwork)?;
                abc::run(&self.config.abc, work_dir.path(), network, command.trim())?
            }
        };

        self.network = Some(network);
        Ok(())
    }

    fn network(&self) -> Option<&Aig> {
        self.network.as_ref()
    }
}
