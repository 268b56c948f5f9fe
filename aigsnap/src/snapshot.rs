//! Read-only, indexed copies of an engine network.

use std::fmt;
use std::io::{self, Write};

use tracing::debug;

use crate::classify::{classify, NodeType};
use crate::error::SnapshotError;
use crate::network::Network;

/// One node of a snapshot: an entry of the adjacency list.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AigNode {
    fanin0: Option<usize>,
    fanin1: Option<usize>,
    fanouts: Vec<usize>,
    node_type: NodeType,
}

impl Default for AigNode {
    fn default() -> Self {
        Self {
            fanin0: None,
            fanin1: None,
            fanouts: Vec::new(),
            node_type: NodeType::Unclassified,
        }
    }
}

impl AigNode {
    /// Returns true if this node has a fanin 0.
    #[must_use]
    pub const fn has_fanin0(&self) -> bool {
        self.fanin0.is_some()
    }

    /// The index of fanin 0.
    ///
    /// # Panics
    ///
    /// Panics if the node has no fanin 0; check [`AigNode::has_fanin0`] first.
    #[must_use]
    pub fn fanin0(&self) -> usize {
        self.fanin0.expect("the node does not have fanin 0")
    }

    /// Returns true if this node has a fanin 1.
    #[must_use]
    pub const fn has_fanin1(&self) -> bool {
        self.fanin1.is_some()
    }

    /// The index of fanin 1.
    ///
    /// # Panics
    ///
    /// Panics if the node has no fanin 1; check [`AigNode::has_fanin1`] first.
    #[must_use]
    pub fn fanin1(&self) -> usize {
        self.fanin1.expect("the node does not have fanin 1")
    }

    /// Both fanins as options.
    #[must_use]
    pub const fn fanins(&self) -> (Option<usize>, Option<usize>) {
        (self.fanin0, self.fanin1)
    }

    /// Number of fanouts.
    #[must_use]
    pub fn num_fanouts(&self) -> usize {
        self.fanouts.len()
    }

    /// The `index`th fanout of this node.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_fanouts()`.
    #[must_use]
    pub fn fanout(&self, index: usize) -> usize {
        assert!(
            index < self.fanouts.len(),
            "the node only has {} fanouts, but asked for the {}th",
            self.fanouts.len(),
            index
        );
        self.fanouts[index]
    }

    /// All fanouts, in engine order.
    #[must_use]
    pub fn fanouts(&self) -> &[usize] {
        &self.fanouts
    }

    /// The node role.
    ///
    /// # Panics
    ///
    /// Panics on an unclassified node, which a built snapshot never contains.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        assert_ne!(self.node_type, NodeType::Unclassified, "node type is unknown");
        self.node_type
    }
}

/// Aggregate counts of a snapshot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AigStats {
    /// Primary inputs.
    pub num_in: usize,
    /// Primary outputs.
    pub num_out: usize,
    /// Latches. Always zero: latch objects are not classifiable.
    pub num_lat: usize,
    /// AND gates.
    pub num_and: usize,
    /// The deepest logic level.
    pub lev: u32,
}

impl fmt::Display for AigStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "i/o = {}/{}  lat = {}  and = {}  lev = {}",
            self.num_in, self.num_out, self.num_lat, self.num_and, self.lev
        )
    }
}

/// An immutable, indexed copy of a network.
///
/// Node `i` of the snapshot is object `i` of the network it was built from.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Snapshot {
    nodes: Vec<AigNode>,
    stats: AigStats,
}

impl Snapshot {
    /// Build a snapshot of `network` in a single pass.
    ///
    /// # Errors
    ///
    /// Fails if any object cannot be classified, or if any adjacency entry points outside the network. Nothing of
    /// the partial build is kept.
    pub fn build<N: Network + ?Sized>(network: &N) -> Result<Self, SnapshotError> {
        let count = network.object_count();
        let mut nodes = vec![AigNode::default(); count];
        let mut stats = AigStats::default();

        for (index, object) in network.objects() {
            let classified = classify(index, &object)?;

            match classified.node_type {
                NodeType::PrimaryInput => stats.num_in += 1,
                NodeType::PrimaryOutput => stats.num_out += 1,
                node_type if node_type.is_and() => stats.num_and += 1,
                _ => {}
            }
            stats.lev = stats.lev.max(object.level);

            let node = &mut nodes[index];
            node.node_type = classified.node_type;
            node.fanin0 = classified.fanin0;
            node.fanin1 = classified.fanin1;
            node.fanouts = object.fanouts.to_vec();
        }

        for (index, node) in nodes.iter().enumerate() {
            let mut targets = node.fanin0.iter().chain(node.fanin1.iter()).chain(node.fanouts.iter());
            if let Some(&target) = targets.find(|&&target| target >= count) {
                return Err(SnapshotError::DanglingIndex { index, target, count });
            }
        }

        debug!(nodes = count, %stats, "built AIG snapshot");

        Ok(Self { nodes, stats })
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the snapshot has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[must_use]
    pub fn node(&self, index: usize) -> &AigNode {
        assert!(
            index < self.nodes.len(),
            "access node out of range {} / {}",
            index,
            self.nodes.len()
        );
        &self.nodes[index]
    }

    /// The node at `index`, if there is one.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AigNode> {
        self.nodes.get(index)
    }

    /// Iterate over `(index, node)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &AigNode)> + '_ {
        self.nodes.iter().enumerate()
    }

    /// Statistics gathered while building.
    #[must_use]
    pub const fn stats(&self) -> AigStats {
        self.stats
    }

    /// Write the snapshot as a Graphviz digraph. Inverted edges get a circle at their tail.
    ///
    /// # Errors
    ///
    /// Propagates write errors.
    pub fn to_graphviz<W: Write>(&self, mut f: W) -> io::Result<()> {
        writeln!(f, "strict digraph {{")?;

        for (index, node) in self.iter() {
            match node.node_type {
                NodeType::PrimaryInput => {
                    writeln!(f, "{} [shape=box,color=blue,label=\"Input {0}\"];", index)?;
                }
                NodeType::PrimaryOutput => {
                    writeln!(f, "{} [shape=box,color=green,label=\"Output {0}\"];", index)?;
                }
                NodeType::Const1 => {
                    writeln!(f, "{} [shape=point,label=\"1\"];", index)?;
                }
                _ => {
                    writeln!(f, "{} [label=\"AND {0}\"];", index)?;
                }
            }
        }

        for (index, node) in self.iter() {
            let (inverted0, inverted1) = match node.node_type {
                NodeType::AndInvertFirst => (true, false),
                NodeType::AndInvertBoth => (true, true),
                _ => (false, false),
            };

            for (fanin, inverted) in node.fanin0.into_iter().zip(Some(inverted0)).chain(node.fanin1.into_iter().zip(Some(inverted1))) {
                writeln!(f, "{} -> {} {};", fanin, index, if inverted { "[dir=both,arrowtail=odot]" } else { "" })?;
            }
        }

        writeln!(f, "}}")
    }
}
