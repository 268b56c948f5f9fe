use std::io::Write;

use aigsnap::aig::Aig;
use aigsnap::{aiger_io, Error, Frame, FrameConfig, NodeType, Session};
use tempfile::NamedTempFile;

// out = in0 & !in1
const AND_NOT: &str = "aag 3 2 0 1 1\n2\n4\n6\n6 2 5\n";

fn ascii(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".aag").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn binary(aig: &Aig) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".aig").tempfile().unwrap();
    aiger_io::write_binary(aig, &mut file).unwrap();
    file.flush().unwrap();
    file
}

fn xor() -> Aig {
    let mut aig = Aig::new();
    let x = aig.push_input();
    let y = aig.push_input();
    let o = aig.push_output();
    let a = aig.and(x, !y);
    let b = aig.and(!x, y);
    let n = aig.and(!a, !b);
    aig.set_output(o, !n);
    aig
}

fn session() -> Session<Frame> {
    let mut session = Session::new(Frame::new(FrameConfig::default().with_abc("/nonexistent/abc")));
    session.start().unwrap();
    session
}

#[test]
fn two_input_and() {
    let design = ascii(AND_NOT);
    let mut session = session();
    session.read(design.path()).unwrap();

    assert_eq!(session.num_nodes(), 5);
    let stats = session.aig_stats().unwrap();
    assert_eq!(stats.num_in, 2);
    assert_eq!(stats.num_out, 1);
    assert_eq!(stats.num_lat, 0);
    assert_eq!(stats.num_and, 1);
    assert_eq!(stats.lev, 1);
    assert_eq!(stats.to_string(), "i/o = 2/1  lat = 0  and = 1  lev = 1");

    assert_eq!(session.aig_node(0).node_type(), NodeType::Const1);
    assert_eq!(session.aig_node(1).node_type(), NodeType::PrimaryInput);
    assert_eq!(session.aig_node(2).node_type(), NodeType::PrimaryInput);

    let output = session.aig_node(3);
    assert_eq!(output.node_type(), NodeType::PrimaryOutput);
    assert_eq!(output.fanin0(), 4);
    assert!(!output.has_fanin1());

    let and = session.aig_node(4);
    assert_eq!(and.node_type().code(), 4);
    assert_eq!((and.fanin0(), and.fanin1()), (2, 1));
    assert_eq!(and.fanouts(), &[3]);
    assert_eq!(session.aig_node(1).fanouts(), &[4]);
    assert_eq!(session.aig_node(2).fanouts(), &[4]);
}

#[test]
fn binary_design() {
    let design = binary(&xor());
    let mut session = session();
    session.read(design.path()).unwrap();

    let stats = session.aig_stats().unwrap();
    assert_eq!((stats.num_in, stats.num_out, stats.num_and, stats.lev), (2, 1, 3, 2));

    let count = session.num_nodes();
    assert_eq!(count, 7);
    for index in 0..count {
        let node = session.aig_node(index);
        let (fanin0, fanin1) = node.fanins();
        let fanins = fanin0.into_iter().chain(fanin1).collect::<Vec<_>>();
        assert!(fanins.iter().all(|&fanin| fanin < count));
        assert!(node.fanouts().iter().all(|&fanout| fanout < count));
        assert_eq!(fanins.len(), node.node_type().fanin_count());
    }

    let types = (0..count).map(|index| session.aig_node(index).node_type()).collect::<Vec<_>>();
    assert_eq!(types.iter().filter(|&&t| t == NodeType::AndInvertFirst).count(), 2);
    assert_eq!(types.iter().filter(|&&t| t == NodeType::AndInvertBoth).count(), 1);
    assert_eq!(session.aig_node(3).fanin0(), 6);
}

#[test]
fn failed_read_keeps_the_snapshot() {
    let design = ascii(AND_NOT);
    let mut session = session();
    session.read(design.path()).unwrap();

    match session.read("/nonexistent/design.aag") {
        Err(error @ Error::LoadFailed { .. }) => {
            assert!(error.to_string().starts_with("cannot read design /nonexistent/design.aag: "));
            let source = std::error::Error::source(&error).expect("load failures keep their cause");
            assert!(source.to_string().starts_with("cannot execute command \"read /nonexistent/design.aag\""));
        }
        other => panic!("expected a load failure, got {:?}", other),
    }
    assert_eq!(session.num_nodes(), 5);
}

#[test]
fn sequential_designs_are_rejected() {
    let design = ascii("aag 1 0 1 1 0\n2 3\n2\n");
    let mut session = session();
    assert!(matches!(session.read(design.path()), Err(Error::LoadFailed { .. })));
    assert_eq!(session.num_nodes(), 0);
}

#[test]
fn compress2rs_without_abc() {
    let design = ascii(AND_NOT);
    let mut session = session();
    session.read(design.path()).unwrap();

    match session.compress2rs() {
        Err(Error::RecipeFailed { step, source }) => {
            assert_eq!(step, 0);
            assert!(matches!(*source, Error::CommandFailed { .. }));
        }
        other => panic!("expected a recipe failure, got {:?}", other),
    }
    assert_eq!(session.aig_stats().unwrap().num_and, 1);
}

#[test]
fn graphviz() {
    let design = ascii(AND_NOT);
    let mut session = session();
    session.read(design.path()).unwrap();

    let mut dot = Vec::new();
    session.snapshot().unwrap().to_graphviz(&mut dot).unwrap();
    let dot = String::from_utf8(dot).unwrap();
    assert!(dot.starts_with("strict digraph {"));
    assert!(dot.contains("2 -> 4 [dir=both,arrowtail=odot];"));
    assert!(dot.contains("4 -> 3 ;"));
}

#[test]
#[should_panic(expected = "access node out of range")]
fn node_past_the_end() {
    let design = ascii(AND_NOT);
    let mut session = session();
    session.read(design.path()).unwrap();
    let _ = session.aig_node(session.num_nodes());
}

/// An `abc` stand-in: transforms replace the network with a two-input XOR, and any other read yields `AND_NOT`.
#[cfg(unix)]
const FAKE_ABC: &str = "#!/bin/sh
case \"$2\" in
\"read in.aig;\"*) printf 'aag 5 2 0 1 3\\n2\\n4\\n11\\n6 2 5\\n8 3 4\\n10 7 9\\n' > out.aig ;;
*) printf 'aag 3 2 0 1 1\\n2\\n4\\n6\\n6 2 5\\n' > out.aig ;;
esac
";

#[cfg(unix)]
fn script(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
fn session_with(abc: &std::path::Path) -> Session<Frame> {
    let mut session = Session::new(Frame::new(FrameConfig::default().with_abc(abc)));
    session.start().unwrap();
    session
}

#[test]
#[cfg(unix)]
fn transforms_through_abc() {
    let dir = tempfile::tempdir().unwrap();
    let abc = script(dir.path(), "abc", FAKE_ABC);
    let design = ascii(AND_NOT);
    let mut session = session_with(&abc);
    session.read(design.path()).unwrap();
    assert_eq!(session.num_nodes(), 5);

    session.balance(aigsnap::Balance { l: true, ..aigsnap::Balance::default() }).unwrap();
    assert_eq!(session.num_nodes(), 5);
    session.compress2rs().unwrap();
    assert_eq!(session.num_nodes(), 5);
    assert!(session.last_runtime().is_some());

    let stats = session.aig_stats().unwrap();
    assert_eq!(stats.to_string(), "i/o = 2/1  lat = 0  and = 3  lev = 2");
    assert_eq!(session.num_nodes(), 7);
    assert_eq!(session.aig_node(6).node_type(), NodeType::AndInvertBoth);
}

#[test]
#[cfg(unix)]
fn abc_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let abc = script(dir.path(), "abc", "#!/bin/sh\nexit 0\n");
    let design = ascii(AND_NOT);
    let mut session = session_with(&abc);
    session.read(design.path()).unwrap();

    match session.rewrite(aigsnap::Rewrite { l: true, z: false }) {
        Err(Error::CommandFailed { command, .. }) => assert_eq!(command, "rewrite -l"),
        other => panic!("expected a command failure, got {:?}", other),
    }
    assert_eq!(session.aig_stats().unwrap().num_and, 1);
}

#[test]
#[cfg(unix)]
fn other_formats_through_abc() {
    let dir = tempfile::tempdir().unwrap();
    let abc = script(dir.path(), "abc", FAKE_ABC);
    let design = dir.path().join("top.blif");
    std::fs::write(&design, ".model top\n.inputs a b\n.outputs y\n.names a b y\n10 1\n.end\n").unwrap();

    let mut session = session_with(&abc);
    session.read(&design).unwrap();

    let stats = session.aig_stats().unwrap();
    assert_eq!((stats.num_in, stats.num_out, stats.num_and), (2, 1, 1));
    assert_eq!(session.aig_node(4).node_type(), NodeType::AndInvertFirst);
}
