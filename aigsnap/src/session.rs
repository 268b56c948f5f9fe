//! Driving an engine and querying its network.

use std::path::Path;
use std::time::{Duration, Instant};

use itertools::Itertools;
use tracing::{debug, error, info};

use crate::command::{Balance, Command, Refactor, Resub, Rewrite, Transform, COMPRESS2RS};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::snapshot::{AigNode, AigStats, Snapshot};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Idle,
    Running,
    Stopped,
}

/// Exclusive use of one engine, plus a snapshot of its network.
///
/// The snapshot is rebuilt by [`Session::read`], [`Session::aig_stats`] and [`Session::update_graph`]. Transformations
/// leave it as it was, so node queries after a transformation see the network from before it until one of those
/// runs.
///
/// Calling anything other than [`Session::start`] or [`Session::stop`] on a session that is not running panics.
#[derive(Debug)]
pub struct Session<E: Engine = Frame> {
    engine: E,
    state: State,
    snapshot: Option<Snapshot>,
    last_runtime: Option<Duration>,
}

impl Default for Session<Frame> {
    fn default() -> Self {
        Self::new(Frame::default())
    }
}

impl<E: Engine> Session<E> {
    /// Wrap `engine`. The session does not start it.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: State::Idle,
            snapshot: None,
            last_runtime: None,
        }
    }

    /// Start the engine.
    ///
    /// # Errors
    ///
    /// Fails if the session is already running, or if the engine fails to start.
    pub fn start(&mut self) -> Result<()> {
        if self.state == State::Running {
            return Err(Error::AlreadyStarted);
        }
        self.engine.start()?;
        self.state = State::Running;
        info!("engine started");
        Ok(())
    }

    /// Stop the engine. Safe to call on a session that never started.
    pub fn stop(&mut self) {
        self.engine.stop();
        if self.state == State::Running {
            info!("engine stopped");
        }
        self.state = State::Stopped;
    }

    /// Returns true between a successful [`Session::start`] and [`Session::stop`].
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    fn assert_running(&self) {
        assert!(
            self.state == State::Running,
            "session is not running ({:?}); call start() first",
            self.state
        );
    }

    fn execute(&mut self, command: &Command) -> Result<()> {
        let command = command.to_string();
        debug!(%command, "executing");

        let begin = Instant::now();
        let result = self.engine.execute(&command);
        self.last_runtime = Some(begin.elapsed());

        if let Err(e) = &result {
            error!("cannot execute command \"{}\": {}", command, e);
        }
        result
    }

    /// Read a design and structurally hash it, then rebuild the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LoadFailed`] if the engine cannot read or hash the design, and [`Error::Snapshot`] if the
    /// result cannot be snapshotted. Either way the previous snapshot is kept.
    ///
    /// # Panics
    ///
    /// Panics if the session is not running.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.assert_running();
        let path = path.as_ref();

        let begin = Instant::now();
        let loaded = self
            .execute(&Command::Read(path.to_path_buf()))
            .and_then(|()| self.execute(&Command::Strash));
        if let Err(source) = loaded {
            return Err(Error::LoadFailed {
                path: path.to_path_buf(),
                source: Box::new(source),
            });
        }
        self.last_runtime = Some(begin.elapsed());

        self.update_graph()?;
        info!(path = %path.display(), nodes = self.num_nodes(), "read design");
        Ok(())
    }

    /// Run one transformation. Does not rebuild the snapshot.
    ///
    /// # Errors
    ///
    /// Returns the engine's diagnostic if the transformation fails.
    ///
    /// # Panics
    ///
    /// Panics if the session is not running.
    pub fn transform(&mut self, transform: impl Into<Transform>) -> Result<()> {
        self.assert_running();
        self.execute(&Command::Transform(transform.into()))
    }

    /// `balance`: transform the network into a well-balanced AIG.
    ///
    /// # Errors
    ///
    /// See [`Session::transform`].
    pub fn balance(&mut self, balance: Balance) -> Result<()> {
        self.transform(balance)
    }

    /// `resub`: technology-independent restructuring.
    ///
    /// # Errors
    ///
    /// See [`Session::transform`].
    pub fn resub(&mut self, resub: Resub) -> Result<()> {
        self.transform(resub)
    }

    /// `rewrite`: technology-independent rewriting.
    ///
    /// # Errors
    ///
    /// See [`Session::transform`].
    pub fn rewrite(&mut self, rewrite: Rewrite) -> Result<()> {
        self.transform(rewrite)
    }

    /// `refactor`: technology-independent refactoring.
    ///
    /// # Errors
    ///
    /// See [`Session::transform`].
    pub fn refactor(&mut self, refactor: Refactor) -> Result<()> {
        self.transform(refactor)
    }

    /// Run `script` in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecipeFailed`] naming the failed step; later steps are not run.
    ///
    /// # Panics
    ///
    /// Panics if the session is not running.
    pub fn run_script(&mut self, script: &[Transform]) -> Result<()> {
        self.assert_running();
        debug!(script = %script.iter().join("; "), "running script");

        let begin = Instant::now();
        for (step, transform) in script.iter().enumerate() {
            self.transform(*transform).map_err(|source| Error::RecipeFailed {
                step,
                source: Box::new(source),
            })?;
        }
        self.last_runtime = Some(begin.elapsed());
        Ok(())
    }

    /// The `compress2rs` recipe; see [`COMPRESS2RS`].
    ///
    /// # Errors
    ///
    /// See [`Session::run_script`].
    pub fn compress2rs(&mut self) -> Result<()> {
        self.run_script(&COMPRESS2RS)
    }

    /// Rebuild the snapshot from the engine's current network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoNetwork`] if no design was read, and [`Error::Snapshot`] if the network is malformed. The
    /// previous snapshot is kept on failure.
    ///
    /// # Panics
    ///
    /// Panics if the session is not running.
    pub fn update_graph(&mut self) -> Result<()> {
        self.assert_running();
        let network = self.engine.network().ok_or(Error::NoNetwork)?;
        match Snapshot::build(network) {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                Ok(())
            }
            Err(e) => {
                error!("cannot snapshot the network: {}", e);
                Err(e.into())
            }
        }
    }

    /// Rebuild the snapshot and return its statistics.
    ///
    /// # Errors
    ///
    /// See [`Session::update_graph`].
    ///
    /// # Panics
    ///
    /// Panics if the session is not running.
    pub fn aig_stats(&mut self) -> Result<AigStats> {
        self.update_graph()?;
        Ok(self.snapshot.as_ref().map(Snapshot::stats).unwrap_or_default())
    }

    /// Number of nodes in the current snapshot; zero before the first one is built.
    ///
    /// # Panics
    ///
    /// Panics if the session is not running.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.assert_running();
        self.snapshot.as_ref().map_or(0, Snapshot::len)
    }

    /// A node of the current snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the session is not running, or if `index >= num_nodes()`.
    #[must_use]
    pub fn aig_node(&self, index: usize) -> &AigNode {
        self.assert_running();
        match &self.snapshot {
            Some(snapshot) => snapshot.node(index),
            None => panic!("access node out of range {} / 0", index),
        }
    }

    /// The current snapshot, if one was built.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Wall-clock time taken by the last read, transformation or script.
    #[must_use]
    pub const fn last_runtime(&self) -> Option<Duration> {
        self.last_runtime
    }

    /// The wrapped engine.
    #[must_use]
    pub const fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: Engine> Drop for Session<E> {
    fn drop(&mut self) {
        if self.state == State::Running {
            self.stop();
        }
    }
}
