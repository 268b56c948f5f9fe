//! Engine commands.
//!
//! Each transformation is a plain parameter record. The engine's command syntax is produced by the `Display`
//! impls and nowhere else: unset numeric options are left out, and flags appear only when set.

use std::fmt;
use std::path::PathBuf;

/// Value of a raw numeric option meaning "leave it to the engine's default".
pub const UNSET: i32 = -1;

fn from_raw(value: i32) -> Option<i32> {
    if value == UNSET {
        None
    } else {
        Some(value)
    }
}

struct Flag(char, bool);

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 {
            write!(f, " -{}", self.0)?;
        }
        Ok(())
    }
}

struct Numeric(char, Option<i32>);

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(value) = self.1 {
            write!(f, " -{} {}", self.0, value)?;
        }
        Ok(())
    }
}

/// `balance`: rebuild the network as a well-balanced AIG.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Balance {
    /// `-l`: toggle minimizing the number of levels.
    pub l: bool,
    /// `-d`: toggle duplication of logic.
    pub d: bool,
    /// `-s`: toggle duplication on the critical paths.
    pub s: bool,
    /// `-x`: toggle balancing multi-input EXORs.
    pub x: bool,
}

/// `resub`: technology-independent resubstitution.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Resub {
    /// `-K`: the max cut size.
    pub k: Option<i32>,
    /// `-N`: the max number of nodes to add.
    pub n: Option<i32>,
    /// `-F`: the number of fanout levels for ODC computation.
    pub f: Option<i32>,
    /// `-l`: toggle preserving the number of levels.
    pub l: bool,
    /// `-z`: toggle using zero-cost replacements.
    pub z: bool,
}

impl Resub {
    /// Build from raw integers, where [`UNSET`] leaves an option out.
    #[must_use]
    pub fn from_raw(k: i32, n: i32, f: i32, l: bool, z: bool) -> Self {
        Self {
            k: from_raw(k),
            n: from_raw(n),
            f: from_raw(f),
            l,
            z,
        }
    }
}

/// `rewrite`: technology-independent rewriting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Rewrite {
    /// `-l`: toggle preserving the number of levels.
    pub l: bool,
    /// `-z`: toggle using zero-cost replacements.
    pub z: bool,
}

/// `refactor`: technology-independent refactoring.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Refactor {
    /// `-N`: the max support of the collapsed node.
    pub n: Option<i32>,
    /// `-l`: toggle preserving the number of levels.
    pub l: bool,
    /// `-z`: toggle using zero-cost replacements.
    pub z: bool,
}

impl Refactor {
    /// Build from raw integers, where [`UNSET`] leaves an option out.
    #[must_use]
    pub fn from_raw(n: i32, l: bool, z: bool) -> Self {
        Self { n: from_raw(n), l, z }
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "balance{}{}{}{}", Flag('l', self.l), Flag('d', self.d), Flag('s', self.s), Flag('x', self.x))
    }
}

impl fmt::Display for Resub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "resub{}{}{}{}{}",
            Numeric('K', self.k),
            Numeric('N', self.n),
            Numeric('F', self.f),
            Flag('l', self.l),
            Flag('z', self.z)
        )
    }
}

impl fmt::Display for Rewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rewrite{}{}", Flag('l', self.l), Flag('z', self.z))
    }
}

impl fmt::Display for Refactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "refactor{}{}{}", Numeric('N', self.n), Flag('l', self.l), Flag('z', self.z))
    }
}

/// A structural transformation of the current network.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transform {
    /// See [`Balance`].
    Balance(Balance),
    /// See [`Resub`].
    Resub(Resub),
    /// See [`Rewrite`].
    Rewrite(Rewrite),
    /// See [`Refactor`].
    Refactor(Refactor),
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Balance(x) => fmt::Display::fmt(x, f),
            Self::Resub(x) => fmt::Display::fmt(x, f),
            Self::Rewrite(x) => fmt::Display::fmt(x, f),
            Self::Refactor(x) => fmt::Display::fmt(x, f),
        }
    }
}

impl From<Balance> for Transform {
    fn from(x: Balance) -> Self {
        Self::Balance(x)
    }
}

impl From<Resub> for Transform {
    fn from(x: Resub) -> Self {
        Self::Resub(x)
    }
}

impl From<Rewrite> for Transform {
    fn from(x: Rewrite) -> Self {
        Self::Rewrite(x)
    }
}

impl From<Refactor> for Transform {
    fn from(x: Refactor) -> Self {
        Self::Refactor(x)
    }
}

/// Any command a session sends to its engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// Parse a design file, replacing the current network.
    Read(PathBuf),
    /// Structurally hash the current network into an AIG.
    Strash,
    /// Transform the current network.
    Transform(Transform),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(path) => write!(f, "read {}", path.display()),
            Self::Strash => f.write_str("strash"),
            Self::Transform(transform) => fmt::Display::fmt(transform, f),
        }
    }
}

const fn balance_l() -> Transform {
    Transform::Balance(Balance { l: true, d: false, s: false, x: false })
}

const fn resub_l(k: i32, n: Option<i32>) -> Transform {
    Transform::Resub(Resub { k: Some(k), n, f: None, l: true, z: false })
}

const fn rewrite_l(z: bool) -> Transform {
    Transform::Rewrite(Rewrite { l: true, z })
}

const fn refactor_l(z: bool) -> Transform {
    Transform::Refactor(Refactor { n: None, l: true, z })
}

/// The `compress2rs` recipe:
/// `b -l; rs -K 6 -l; rw -l; rs -K 6 -N 2 -l; rf -l; rs -K 8 -l; b -l; rs -K 8 -N 2 -l; rw -l; rs -K 10 -l;
/// rwz -l; rs -K 10 -N 2 -l; b -l; rs -K 12 -l; rfz -l; rs -K 12 -N 2 -l; rwz -l; b -l`.
pub const COMPRESS2RS: [Transform; 18] = [
    balance_l(),
    resub_l(6, None),
    rewrite_l(false),
    resub_l(6, Some(2)),
    refactor_l(false),
    resub_l(8, None),
    balance_l(),
    resub_l(8, Some(2)),
    rewrite_l(false),
    resub_l(10, None),
    rewrite_l(true),
    resub_l(10, Some(2)),
    balance_l(),
    resub_l(12, None),
    refactor_l(true),
    resub_l(12, Some(2)),
    rewrite_l(true),
    balance_l(),
];

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::{Balance, Command, Refactor, Resub, Rewrite, Transform, COMPRESS2RS, UNSET};

    #[test]
    fn defaults_have_no_options() {
        assert_eq!(Balance::default().to_string(), "balance");
        assert_eq!(Resub::default().to_string(), "resub");
        assert_eq!(Rewrite::default().to_string(), "rewrite");
        assert_eq!(Refactor::default().to_string(), "refactor");
    }

    #[test]
    fn flags_in_order() {
        let balance = Balance { l: true, d: true, s: false, x: true };
        assert_eq!(balance.to_string(), "balance -l -d -x");

        let resub = Resub::from_raw(8, 1, 0, true, true);
        assert_eq!(resub.to_string(), "resub -K 8 -N 1 -F 0 -l -z");

        assert_eq!(Rewrite { l: false, z: true }.to_string(), "rewrite -z");
        assert_eq!(Refactor::from_raw(10, true, false).to_string(), "refactor -N 10 -l");
    }

    #[test]
    fn unset_is_never_emitted() {
        let resub = Resub::from_raw(UNSET, UNSET, UNSET, true, false);
        assert_eq!(resub, Resub { l: true, ..Resub::default() });
        assert!(!resub.to_string().contains("-K"));
        assert!(!resub.to_string().contains("-1"));

        let resub = Resub::from_raw(UNSET, 2, UNSET, false, false);
        assert_eq!(resub.to_string(), "resub -N 2");

        assert_eq!(Refactor::from_raw(UNSET, false, true).to_string(), "refactor -z");
    }

    #[test]
    fn zero_is_a_value() {
        assert_eq!(Resub::from_raw(UNSET, 0, UNSET, false, false).to_string(), "resub -N 0");
    }

    #[test]
    fn commands() {
        assert_eq!(Command::Read("designs/i10.aig".into()).to_string(), "read designs/i10.aig");
        assert_eq!(Command::Strash.to_string(), "strash");
        let transform: Transform = Rewrite { l: true, z: false }.into();
        assert_eq!(Command::Transform(transform).to_string(), "rewrite -l");
    }

    #[test]
    fn compress2rs_script() {
        let script = COMPRESS2RS.iter().join("; ");
        assert_eq!(
            script,
            "balance -l; resub -K 6 -l; rewrite -l; resub -K 6 -N 2 -l; refactor -l; resub -K 8 -l; balance -l; \
             resub -K 8 -N 2 -l; rewrite -l; resub -K 10 -l; rewrite -l -z; resub -K 10 -N 2 -l; balance -l; \
             resub -K 12 -l; refactor -l -z; resub -K 12 -N 2 -l; rewrite -l -z; balance -l"
        );
    }
}
