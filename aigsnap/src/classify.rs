//! Mapping engine objects to node roles.

use std::convert::TryFrom;
use std::fmt;

use crate::error::SnapshotError;
use crate::network::{Object, ObjectKind};

/// The role of a snapshot node.
///
/// The numeric codes are a stable external encoding; see [`NodeType::code`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum NodeType {
    /// The constant-1 node.
    Const1 = 0,
    /// A primary output terminal.
    PrimaryOutput = 1,
    /// A primary input terminal.
    PrimaryInput = 2,
    /// `a & b`.
    AndNoInvert = 3,
    /// `!a & b`: fanin 0 is inverted.
    AndInvertFirst = 4,
    /// `!a & !b`.
    AndInvertBoth = 5,
    /// Not yet classified. Never present in a built snapshot.
    Unclassified = 6,
}

impl NodeType {
    /// The numeric encoding of this role.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns true for the three AND roles.
    #[must_use]
    pub const fn is_and(self) -> bool {
        matches!(self, Self::AndNoInvert | Self::AndInvertFirst | Self::AndInvertBoth)
    }

    /// Number of fanins a node of this role carries.
    #[must_use]
    pub const fn fanin_count(self) -> usize {
        match self {
            Self::Const1 | Self::PrimaryInput | Self::Unclassified => 0,
            Self::PrimaryOutput => 1,
            Self::AndNoInvert | Self::AndInvertFirst | Self::AndInvertBoth => 2,
        }
    }
}

impl TryFrom<u8> for NodeType {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Const1),
            1 => Ok(Self::PrimaryOutput),
            2 => Ok(Self::PrimaryInput),
            3 => Ok(Self::AndNoInvert),
            4 => Ok(Self::AndInvertFirst),
            5 => Ok(Self::AndInvertBoth),
            6 => Ok(Self::Unclassified),
            code => Err(code),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Const1 => "const1",
            Self::PrimaryOutput => "po",
            Self::PrimaryInput => "pi",
            Self::AndNoInvert => "and",
            Self::AndInvertFirst => "and(!a)",
            Self::AndInvertBoth => "and(!a,!b)",
            Self::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

/// The role and canonical fanins of one object.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Classified {
    /// The node role.
    pub node_type: NodeType,
    /// Fanin 0; the inverted fanin for `AndInvertFirst`.
    pub fanin0: Option<usize>,
    /// Fanin 1.
    pub fanin1: Option<usize>,
}

/// Classify the object at `index`.
///
/// AND gates with only their second fanin inverted are reported as [`NodeType::AndInvertFirst`] with the fanins
/// swapped, so fanin 0 is always the inverted one.
///
/// # Errors
///
/// Fails on object kinds with no role, and on outputs or AND gates with the wrong number of fanins.
pub fn classify(index: usize, object: &Object<'_>) -> Result<Classified, SnapshotError> {
    match object.kind {
        ObjectKind::Const1 => Ok(Classified {
            node_type: NodeType::Const1,
            fanin0: None,
            fanin1: None,
        }),
        ObjectKind::Pi => Ok(Classified {
            node_type: NodeType::PrimaryInput,
            fanin0: None,
            fanin1: None,
        }),
        ObjectKind::Po => match *object.fanins {
            [driver] => Ok(Classified {
                node_type: NodeType::PrimaryOutput,
                fanin0: Some(driver),
                fanin1: None,
            }),
            _ => Err(SnapshotError::MalformedOutputNode {
                index,
                fanins: object.fanins.len(),
            }),
        },
        ObjectKind::Node => {
            let (a, b) = match *object.fanins {
                [a, b] => (a, b),
                _ => {
                    return Err(SnapshotError::MalformedAndNode {
                        index,
                        fanins: object.fanins.len(),
                    })
                }
            };

            let (node_type, fanin0, fanin1) = match object.complement {
                [false, false] => (NodeType::AndNoInvert, a, b),
                [true, false] => (NodeType::AndInvertFirst, a, b),
                [false, true] => (NodeType::AndInvertFirst, b, a),
                [true, true] => (NodeType::AndInvertBoth, a, b),
            };

            Ok(Classified {
                node_type,
                fanin0: Some(fanin0),
                fanin1: Some(fanin1),
            })
        }
        kind => Err(SnapshotError::UnknownNodeType { index, kind }),
    }
}
