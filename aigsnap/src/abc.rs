//! Running commands through an external `abc` executable.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use crate::aig::Aig;
use crate::aiger_io;
use crate::error::{Error, Result};

const INPUT: &str = "in.aig";
const OUTPUT: &str = "out.aig";

fn failed(command: &str, reason: impl Into<String>) -> Error {
    Error::CommandFailed {
        command: command.to_string(),
        reason: reason.into(),
    }
}

/// Apply `command` to `aig` with the `abc` executable at `binary`, using `work_dir` for scratch files.
///
/// The network goes through `read in.aig; <command>; write_aiger out.aig`, so it comes back re-numbered.
///
/// # Errors
///
/// Fails if the executable cannot be run, exits unsuccessfully, or does not produce a network.
pub fn run(binary: &Path, work_dir: &Path, aig: &Aig, command: &str) -> Result<Aig> {
    let mut writer = BufWriter::new(File::create(work_dir.join(INPUT))?);
    aiger_io::write_binary(aig, &mut writer)?;
    writer.flush()?;

    invoke(binary, work_dir, command, &format!("read {}; {}; write_aiger {}", INPUT, command, OUTPUT))
}

/// Parse `design` with `abc`'s own readers and strash it, for formats other than AIGER.
///
/// `command` names the request in errors.
///
/// # Errors
///
/// Fails if the design does not exist, or as [`run`] does.
pub fn import(binary: &Path, work_dir: &Path, design: &Path, command: &str) -> Result<Aig> {
    let design = design.canonicalize()?;
    invoke(
        binary,
        work_dir,
        command,
        &format!("read {}; strash; write_aiger {}", design.display(), OUTPUT),
    )
}

fn invoke(binary: &Path, work_dir: &Path, command: &str, script: &str) -> Result<Aig> {
    let output = work_dir.join(OUTPUT);
    match std::fs::remove_file(&output) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
        _ => {}
    }

    debug!(binary = %binary.display(), %script, "running abc");

    let result = Command::new(binary)
        .arg("-c")
        .arg(script)
        .current_dir(work_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| failed(command, format!("cannot run {}: {}", binary.display(), e)))?;

    let stdout = String::from_utf8_lossy(&result.stdout);
    let stderr = String::from_utf8_lossy(&result.stderr);
    trace!(%stdout, %stderr, "abc finished");

    if !result.status.success() || !output.exists() {
        // abc reports errors on either stream; the last line is the most specific.
        let reason = stderr
            .lines()
            .chain(stdout.lines())
            .filter(|line| !line.trim().is_empty())
            .last()
            .map_or_else(|| format!("abc exited with {}", result.status), str::to_string);
        return Err(failed(command, reason));
    }

    aiger_io::read(&output)
}

#[cfg(test)]
mod tests {
    use super::{import, run};
    use crate::aig::Aig;
    use crate::error::Error;

    #[test]
    fn missing_binary() {
        let dir = tempfile::tempdir().unwrap();
        let mut aig = Aig::new();
        let x = aig.push_input();
        let o = aig.push_output();
        aig.set_output(o, x);

        let result = run(&dir.path().join("no-such-abc"), dir.path(), &aig, "balance -l");
        match result {
            Err(Error::CommandFailed { command, reason }) => {
                assert_eq!(command, "balance -l");
                assert!(reason.starts_with("cannot run"), "{}", reason);
            }
            other => panic!("expected a command failure, got {:?}", other),
        }
        assert!(dir.path().join("in.aig").exists());
    }

    #[test]
    fn import_needs_the_design() {
        let dir = tempfile::tempdir().unwrap();
        let result = import(&dir.path().join("no-such-abc"), dir.path(), &dir.path().join("top.blif"), "read top.blif");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
