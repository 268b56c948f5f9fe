//! Reading and writing AIGER files.
//!
//! ASCII (`aag`) files are parsed with the `aiger` crate; binary (`aig`) files, which is what the synthesis engine
//! writes, go through `flussab-aiger`. Either way the result is strashed into an [`Aig`]. Only combinational
//! designs are supported.

use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::Path;

use flussab::DeferredWriter;
use flussab_aiger::aig::{OrderedAig, OrderedAndGate};
use flussab_aiger::binary;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::DfsPostOrder;

use crate::aig::{Aig, Lit};
use crate::error::{Error, Result};
use crate::network::Network;

/// An AIGER design as listed in the file, before hashing.
#[derive(Debug, Default)]
struct Model {
    inputs: Vec<usize>,
    outputs: Vec<usize>,
    ands: Vec<[usize; 3]>,
    input_symbols: Vec<(usize, String)>,
    output_symbols: Vec<(usize, String)>,
}

fn bad(message: impl Into<String>) -> Error {
    Error::Aiger(message.into())
}

/// Read an AIGER file in either format.
///
/// # Errors
///
/// Fails on I/O errors, malformed files, latches, and combinational cycles.
pub fn read(path: &Path) -> Result<Aig> {
    let mut contents = Vec::new();
    std::fs::File::open(path)?.read_to_end(&mut contents)?;
    from_bytes(&contents)
}

/// Returns true if `contents` starts like an AIGER file of either format.
#[must_use]
pub fn is_aiger(contents: &[u8]) -> bool {
    contents.starts_with(b"aag") || contents.starts_with(b"aig")
}

/// Parse AIGER data in either format.
///
/// # Errors
///
/// Fails on malformed data, latches, and combinational cycles.
pub fn from_bytes(contents: &[u8]) -> Result<Aig> {
    let model = if contents.starts_with(b"aag") {
        parse_ascii(contents)?
    } else if contents.starts_with(b"aig") {
        parse_binary(contents)?
    } else {
        return Err(bad("not an AIGER file"));
    };
    model.into_aig()
}

fn parse_ascii(contents: &[u8]) -> Result<Model> {
    let reader = aiger::Reader::from_reader(contents).map_err(|e| bad(format!("{:?}", e)))?;
    if reader.header().l != 0 {
        return Err(bad("latches are not supported"));
    }

    let mut model = Model::default();

    for record in reader.records() {
        match record.map_err(|e| bad(format!("{:?}", e)))? {
            aiger::Aiger::Input(l) => model.inputs.push(l.variable()),
            aiger::Aiger::Latch { output: _, input: _ } => return Err(bad("latches are not supported")),
            aiger::Aiger::Output(aiger::Literal(l)) => model.outputs.push(l),
            aiger::Aiger::AndGate { output, inputs } => {
                let aiger::Literal(lhs) = output;
                let aiger::Literal(rhs0) = inputs[0];
                let aiger::Literal(rhs1) = inputs[1];
                model.ands.push([lhs, rhs0, rhs1]);
            }
            aiger::Aiger::Symbol { type_spec, position, symbol } => match type_spec {
                aiger::Symbol::Input => model.input_symbols.push((position, symbol)),
                aiger::Symbol::Output => model.output_symbols.push((position, symbol)),
                aiger::Symbol::Latch => {}
            },
        }
    }

    Ok(model)
}

fn parse_binary(contents: &[u8]) -> Result<Model> {
    let parser = binary::Parser::<u32>::from_read(contents, binary::Config::default())
        .map_err(|e| bad(e.to_string()))?;
    let ordered = parser.parse().map_err(|e| bad(e.to_string()))?;
    if !ordered.latches.is_empty() {
        return Err(bad("latches are not supported"));
    }

    // Binary AIGER numbers inputs 1..=I and gives AND gates the following variables in order.
    let inputs = ordered.input_count;
    Ok(Model {
        inputs: (1..=inputs).collect(),
        outputs: ordered.outputs.iter().map(|&output| output as usize).collect(),
        ands: ordered
            .and_gates
            .iter()
            .enumerate()
            .map(|(gate, and)| [2 * (inputs + gate + 1), and.inputs[0] as usize, and.inputs[1] as usize])
            .collect(),
        ..Model::default()
    })
}

impl Model {
    fn into_aig(self) -> Result<Aig> {
        let mut aig = Aig::new();
        let mut variables: HashMap<usize, Lit> = HashMap::new();
        variables.insert(0, Lit::FALSE);

        for &input in &self.inputs {
            if input == 0 || variables.insert(input, aig.push_input()).is_some() {
                return Err(bad(format!("variable {} defined twice", input)));
            }
        }
        for _ in &self.outputs {
            let _ = aig.push_output();
        }

        // Gates only reach the AIG if an output depends on them, in post-order from the outputs.
        let mut gates: HashMap<usize, NodeIndex> = HashMap::new();
        let mut graph = DiGraph::<usize, ()>::new();
        for (index, [lhs, _, _]) in self.ands.iter().enumerate() {
            if lhs & 1 == 1 || variables.contains_key(&(lhs >> 1)) || gates.insert(lhs >> 1, graph.add_node(index)).is_some() {
                return Err(bad(format!("variable {} defined twice", lhs >> 1)));
            }
        }
        for &[lhs, rhs0, rhs1] in &self.ands {
            let gate = gates[&(lhs >> 1)];
            for &rhs in [rhs1, rhs0].iter() {
                if let Some(&fanin) = gates.get(&(rhs >> 1)) {
                    graph.add_edge(gate, fanin, ());
                }
            }
        }

        let literal = |variables: &HashMap<usize, Lit>, literal: usize| -> Result<Lit> {
            match variables.get(&(literal >> 1)) {
                Some(&lit) if literal & 1 == 1 => Ok(!lit),
                Some(&lit) => Ok(lit),
                None if gates.contains_key(&(literal >> 1)) => Err(bad("combinational cycle")),
                None => Err(bad(format!("variable {} is never defined", literal >> 1))),
            }
        };

        let mut dfs = DfsPostOrder::empty(&graph);
        for &output in &self.outputs {
            if let Some(&start) = gates.get(&(output >> 1)) {
                dfs.move_to(start);
                while let Some(node) = dfs.next(&graph) {
                    let [lhs, rhs0, rhs1] = self.ands[graph[node]];
                    let a = literal(&variables, rhs0)?;
                    let b = literal(&variables, rhs1)?;
                    let gate = aig.and(a, b);
                    variables.insert(lhs >> 1, gate);
                }
            }
        }

        for (position, &output) in self.outputs.iter().enumerate() {
            aig.set_output(position, literal(&variables, output)?);
        }

        for (position, symbol) in self.input_symbols {
            if position < aig.input_count() {
                let index = aig.input(position).object();
                aig.set_symbol(index, symbol);
            }
        }
        for (position, symbol) in self.output_symbols {
            if position < aig.output_count() {
                aig.set_symbol(1 + aig.input_count() + position, symbol);
            }
        }

        Ok(aig)
    }
}

fn literal(value: usize) -> io::Result<u32> {
    u32::try_from(value).map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "network too large for AIGER"))
}

/// Write `aig` in the binary AIGER format. Symbols are not written.
///
/// # Errors
///
/// Propagates write errors, and fails if a literal does not fit in 32 bits.
pub fn write_binary<W: Write>(aig: &Aig, writer: W) -> io::Result<()> {
    let inputs = aig.input_count();
    let ands = aig.and_count();

    // AIGER variables: inputs are 1..=I, AND gates follow in object order.
    let mut variable = vec![0; aig.object_count()];
    for position in 0..inputs {
        variable[aig.input(position).object()] = position + 1;
    }
    for (offset, index) in aig.and_nodes().enumerate() {
        variable[index] = inputs + offset + 1;
    }
    let encode = |lit: Lit| {
        if lit.is_const() {
            literal(usize::from(!lit.is_complement()))
        } else {
            literal(2 * variable[lit.object()] + usize::from(lit.is_complement()))
        }
    };

    let outputs = (0..aig.output_count())
        .map(|position| encode(aig.output_driver(position).unwrap_or(Lit::FALSE)))
        .collect::<io::Result<Vec<_>>>()?;

    let mut and_gates = Vec::with_capacity(ands);
    for index in aig.and_nodes() {
        let (a, b) = aig.and_fanins(index);
        let (a, b) = (encode(a)?, encode(b)?);
        and_gates.push(OrderedAndGate { inputs: [a.max(b), a.min(b)] });
    }

    let ordered = OrderedAig {
        max_var_index: inputs + ands,
        input_count: inputs,
        outputs,
        and_gates,
        ..OrderedAig::default()
    };

    let mut writer = binary::Writer::<u32>::new(DeferredWriter::from_write(writer));
    writer.write_ordered_aig(&ordered);
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::{from_bytes, is_aiger, read, write_binary};
    use crate::aig::{Aig, Lit};
    use crate::error::Error;
    use crate::network::{Network, ObjectKind};

    // o0 = i0 & !i1
    const AND_NOT: &str = "aag 3 2 0 1 1\n2\n4\n6\n6 2 5\ni0 a\ni1 b\no0 y\n";

    #[test]
    fn ascii() {
        let aig = from_bytes(AND_NOT.as_bytes()).unwrap();
        assert_eq!(aig.object_count(), 5);
        assert_eq!(aig.object(3).kind, ObjectKind::Po);
        assert_eq!(aig.object(4).kind, ObjectKind::Node);
        assert_eq!(aig.and_fanins(4), (Lit::new(1, false), Lit::new(2, true)));
        assert_eq!(aig.output_driver(0), Some(Lit::new(4, false)));
        assert_eq!(aig.symbol(1).map(String::as_str), Some("a"));
        assert_eq!(aig.symbol(3).map(String::as_str), Some("y"));
    }

    #[test]
    fn binary_round_trip() {
        let aig = from_bytes(AND_NOT.as_bytes()).unwrap();
        let mut bytes = Vec::new();
        write_binary(&aig, &mut bytes).unwrap();
        assert!(bytes.starts_with(b"aig 3 2 0 1 1\n6\n"));

        let back = from_bytes(&bytes).unwrap();
        assert_eq!(back.and_fanins(4), aig.and_fanins(4));
        assert_eq!(back.output_driver(0), aig.output_driver(0));
        assert_eq!(back.symbol(1), None);
    }

    #[test]
    fn detects_aiger() {
        assert!(is_aiger(b"aag 0 0 0 0 0\n"));
        assert!(is_aiger(b"aig 0 0 0 0 0\n"));
        assert!(!is_aiger(b".model top\n"));
        assert!(!is_aiger(b""));
    }

    #[test]
    fn binary_large_deltas() {
        // A long chain makes the first delta of the last gate span several bytes.
        let mut aig = Aig::new();
        let x = aig.push_input();
        let y = aig.push_input();
        let o = aig.push_output();
        let first = aig.and(x, y);
        let mut last = first;
        for _ in 0..200 {
            last = aig.and(last, !y);
            last = aig.or(last, x);
        }
        let top = aig.and(last, !first);
        aig.set_output(o, top);

        let mut bytes = Vec::new();
        write_binary(&aig, &mut bytes).unwrap();
        assert_eq!(from_bytes(&bytes).unwrap(), aig.strash());
    }

    #[test]
    fn constant_outputs() {
        let aig = from_bytes(b"aag 1 1 0 2 0\n2\n0\n1\n").unwrap();
        assert_eq!(aig.output_driver(0), Some(Lit::FALSE));
        assert_eq!(aig.output_driver(1), Some(Lit::TRUE));
        assert_eq!(aig.object(0).fanouts, &[2, 3]);
    }

    #[test]
    fn dangling_gates_are_dropped() {
        let aig = from_bytes(b"aag 4 2 0 1 2\n2\n4\n6\n6 2 4\n8 3 5\n").unwrap();
        assert_eq!(aig.and_count(), 1);
    }

    #[test]
    fn latches_are_rejected() {
        assert!(matches!(from_bytes(b"aig 1 0 1 0 0\n2\n"), Err(Error::Aiger(_))));
    }

    #[test]
    fn cycles_are_rejected() {
        assert!(matches!(from_bytes(b"aag 3 1 0 1 2\n2\n4\n4 2 6\n6 4 2\n"), Err(Error::Aiger(_))));
    }

    #[test]
    fn undefined_variables_are_rejected() {
        assert!(matches!(from_bytes(b"aag 3 1 0 1 1\n2\n4\n4 2 6\n"), Err(Error::Aiger(_))));
    }

    #[test]
    fn not_aiger() {
        assert!(matches!(from_bytes(b"module top;"), Err(Error::Aiger(_))));
    }

    #[test]
    fn from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("and.aag");
        std::fs::write(&path, AND_NOT).unwrap();
        assert_eq!(read(&path).unwrap().and_count(), 1);
        assert!(matches!(read(&dir.path().join("missing.aag")), Err(Error::Io(_))));
    }
}
