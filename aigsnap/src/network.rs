//! The engine-side object model.

use std::fmt;

/// The type of an engine network object.
///
/// Discriminants follow the engine's own numbering.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum ObjectKind {
    /// An unused slot.
    None = 0,
    /// The constant-1 node.
    Const1 = 1,
    /// A primary input terminal.
    Pi = 2,
    /// A primary output terminal.
    Po = 3,
    /// A box input terminal.
    Bi = 4,
    /// A box output terminal.
    Bo = 5,
    /// A net.
    Net = 6,
    /// An internal node; in a strashed network, a two-input AND gate.
    Node = 7,
    /// A latch.
    Latch = 8,
    /// A box with known contents.
    WhiteBox = 9,
    /// A box with unknown contents.
    BlackBox = 10,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Const1 => "const1",
            Self::Pi => "pi",
            Self::Po => "po",
            Self::Bi => "bi",
            Self::Bo => "bo",
            Self::Net => "net",
            Self::Node => "node",
            Self::Latch => "latch",
            Self::WhiteBox => "whitebox",
            Self::BlackBox => "blackbox",
        };
        write!(f, "{} ({})", *self as u8, name)
    }
}

/// A borrowed view of one network object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Object<'a> {
    /// Object type.
    pub kind: ObjectKind,
    /// Indices of the objects driving this one, in engine order.
    pub fanins: &'a [usize],
    /// Indices of the objects this one drives, in engine order.
    pub fanouts: &'a [usize],
    /// Complement flags of fanin 0 and fanin 1.
    pub complement: [bool; 2],
    /// Logic level reported by the engine.
    pub level: u32,
}

/// A network owned by an engine.
///
/// Objects are numbered `0..object_count()` and adjacency is expressed in those numbers.
pub trait Network {
    /// Returns the number of object slots in the network.
    fn object_count(&self) -> usize;
    /// Returns the object at `index`.
    ///
    /// # Panics
    ///
    /// Implementations panic when `index >= object_count()`.
    fn object(&self, index: usize) -> Object<'_>;

    /// Iterate over all objects in enumeration order.
    fn objects(&self) -> Box<dyn Iterator<Item = (usize, Object<'_>)> + '_> {
        Box::new((0..self.object_count()).map(move |index| (index, self.object(index))))
    }
}
