//! A structurally hashed and-inverter graph.

use std::collections::HashMap;
use std::ops::Not;

use crate::network::{Network, Object, ObjectKind};

/// A reference to an AIG object, possibly inverted.
///
/// The least significant bit signifies inversion state.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Lit(usize);

impl Lit {
    /// Constant one: the constant node itself.
    pub const TRUE: Self = Self(0);
    /// Constant zero: the inverted constant node.
    pub const FALSE: Self = Self(1);

    /// A reference to `object`, inverted if `complement` is set.
    #[must_use]
    pub const fn new(object: usize, complement: bool) -> Self {
        Self((object << 1) | complement as usize)
    }

    /// The index of the referenced object.
    #[must_use]
    pub const fn object(self) -> usize {
        self.0 >> 1
    }

    /// Returns true if the reference is inverted.
    #[must_use]
    pub const fn is_complement(self) -> bool {
        self.0 & 1 == 1
    }

    /// Returns true if this is one of the constants.
    #[must_use]
    pub const fn is_const(self) -> bool {
        self.object() == 0
    }
}

impl Not for Lit {
    type Output = Self;

    fn not(self) -> Self {
        Self(self.0 ^ 1)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct AigObject {
    kind: ObjectKind,
    fanins: Vec<usize>,
    fanouts: Vec<usize>,
    complement: [bool; 2],
    level: u32,
}

impl AigObject {
    const fn new(kind: ObjectKind) -> Self {
        Self {
            kind,
            fanins: Vec::new(),
            fanouts: Vec::new(),
            complement: [false, false],
            level: 0,
        }
    }
}

/// A structurally-hashed and-inverter graph.
///
/// Objects are laid out the way the synthesis engine lays out a strashed network: the constant node is object 0,
/// followed by every primary input, every primary output, and then the AND gates in topological order.
#[derive(Clone, Debug, PartialEq)]
pub struct Aig {
    objects: Vec<AigObject>,
    inputs: Vec<usize>,
    outputs: Vec<usize>,
    strash: HashMap<(Lit, Lit), usize>,
    symbols: HashMap<usize, String>,
}

impl Default for Aig {
    fn default() -> Self {
        Self::new()
    }
}

impl Aig {
    /// Create an AIG holding only the constant node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: vec![AigObject::new(ObjectKind::Const1)],
            inputs: Vec::new(),
            outputs: Vec::new(),
            strash: HashMap::new(),
            symbols: HashMap::new(),
        }
    }

    /// Append a primary input.
    ///
    /// # Panics
    ///
    /// Panics if an output or AND gate was already added.
    pub fn push_input(&mut self) -> Lit {
        assert!(self.outputs.is_empty() && self.strash.is_empty(), "inputs must precede outputs and AND gates");
        let index = self.objects.len();
        self.objects.push(AigObject::new(ObjectKind::Pi));
        self.inputs.push(index);
        Lit::new(index, false)
    }

    /// Append an unconnected primary output, returning its position. Connect it with [`Aig::set_output`].
    ///
    /// # Panics
    ///
    /// Panics if an AND gate was already added.
    pub fn push_output(&mut self) -> usize {
        assert!(self.strash.is_empty(), "outputs must precede AND gates");
        let index = self.objects.len();
        self.objects.push(AigObject::new(ObjectKind::Po));
        self.outputs.push(index);
        self.outputs.len() - 1
    }

    /// Drive output `position` with `driver`.
    pub fn set_output(&mut self, position: usize, driver: Lit) {
        let output = self.outputs[position];

        if let Some(&old) = self.objects[output].fanins.first() {
            let fanouts = &mut self.objects[old].fanouts;
            if let Some(slot) = fanouts.iter().position(|&fanout| fanout == output) {
                fanouts.remove(slot);
            }
        }

        let level = self.objects[driver.object()].level;
        let object = &mut self.objects[output];
        object.fanins = vec![driver.object()];
        object.complement = [driver.is_complement(), false];
        object.level = level;
        self.objects[driver.object()].fanouts.push(output);
    }

    /// Return `a & b`, reusing an existing gate where possible.
    pub fn and(&mut self, a: Lit, b: Lit) -> Lit {
        let (a, b) = if a.object() <= b.object() { (a, b) } else { (b, a) };

        // x & 0 = 0, x & 1 = x, x & x = x, x & x' = 0
        if a == Lit::FALSE {
            return Lit::FALSE;
        }
        if a == Lit::TRUE {
            return b;
        }
        if a == b {
            return a;
        }
        if a == !b {
            return Lit::FALSE;
        }

        if let Some(&index) = self.strash.get(&(a, b)) {
            return Lit::new(index, false);
        }

        let index = self.objects.len();
        let level = 1 + self.objects[a.object()].level.max(self.objects[b.object()].level);
        self.objects.push(AigObject {
            kind: ObjectKind::Node,
            fanins: vec![a.object(), b.object()],
            fanouts: Vec::new(),
            complement: [a.is_complement(), b.is_complement()],
            level,
        });
        self.objects[a.object()].fanouts.push(index);
        self.objects[b.object()].fanouts.push(index);
        self.strash.insert((a, b), index);

        Lit::new(index, false)
    }

    /// Return `a | b`.
    pub fn or(&mut self, a: Lit, b: Lit) -> Lit {
        !self.and(!a, !b)
    }

    /// The `position`th primary input.
    #[must_use]
    pub fn input(&self, position: usize) -> Lit {
        Lit::new(self.inputs[position], false)
    }

    /// The driver of the `position`th primary output, if connected.
    #[must_use]
    pub fn output_driver(&self, position: usize) -> Option<Lit> {
        let object = &self.objects[self.outputs[position]];
        object.fanins.first().map(|&driver| Lit::new(driver, object.complement[0]))
    }

    /// Number of primary inputs.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of primary outputs.
    #[must_use]
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Number of AND gates.
    #[must_use]
    pub fn and_count(&self) -> usize {
        self.objects.len() - 1 - self.inputs.len() - self.outputs.len()
    }

    /// Object indices of the AND gates, in topological order.
    pub fn and_nodes(&self) -> impl Iterator<Item = usize> + '_ {
        (1 + self.inputs.len() + self.outputs.len())..self.objects.len()
    }

    /// The fanins of an AND gate as literals.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not an AND gate.
    #[must_use]
    pub fn and_fanins(&self, index: usize) -> (Lit, Lit) {
        let object = &self.objects[index];
        assert_eq!(object.kind, ObjectKind::Node, "object {} is not an AND gate", index);
        (
            Lit::new(object.fanins[0], object.complement[0]),
            Lit::new(object.fanins[1], object.complement[1]),
        )
    }

    /// Name the object at `index`.
    pub fn set_symbol(&mut self, index: usize, symbol: String) {
        self.symbols.insert(index, symbol);
    }

    /// The name of the object at `index`, if it has one.
    #[must_use]
    pub fn symbol(&self, index: usize) -> Option<&String> {
        self.symbols.get(&index)
    }

    /// Rebuild the graph, dropping AND gates that no output depends on.
    #[must_use]
    pub fn strash(&self) -> Self {
        let mut referenced = vec![false; self.objects.len()];
        let mut visit_list = self.outputs.iter().flat_map(|&output| self.objects[output].fanins.clone()).collect::<Vec<_>>();
        while let Some(index) = visit_list.pop() {
            if referenced[index] {
                continue;
            }
            referenced[index] = true;
            visit_list.extend_from_slice(&self.objects[index].fanins);
        }

        let mut aig = Self::new();
        let mut map = vec![None; self.objects.len()];
        map[0] = Some(Lit::TRUE);

        for &input in &self.inputs {
            map[input] = Some(aig.push_input());
        }
        for _ in &self.outputs {
            let _ = aig.push_output();
        }

        let translate = |map: &[Option<Lit>], lit: Lit| {
            let mapped = map[lit.object()].expect("AND gates are in topological order");
            if lit.is_complement() { !mapped } else { mapped }
        };

        for index in self.and_nodes().filter(|&index| referenced[index]) {
            let (a, b) = self.and_fanins(index);
            let (a, b) = (translate(&map, a), translate(&map, b));
            map[index] = Some(aig.and(a, b));
        }

        for position in 0..self.outputs.len() {
            if let Some(driver) = self.output_driver(position) {
                aig.set_output(position, translate(&map, driver));
            }
        }

        // Terminals keep their indices.
        for (&index, symbol) in &self.symbols {
            if matches!(self.objects[index].kind, ObjectKind::Pi | ObjectKind::Po) {
                aig.set_symbol(index, symbol.clone());
            }
        }

        aig
    }
}

impl Network for Aig {
    fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn object(&self, index: usize) -> Object<'_> {
        let object = &self.objects[index];
        Object {
            kind: object.kind,
            fanins: &object.fanins,
            fanouts: &object.fanouts,
            complement: object.complement,
            level: object.level,
        }
    }
}
