use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use aigsnap::{Balance, Frame, FrameConfig, Refactor, Resub, Rewrite, Session};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, Level};

/// Load an AIGER design, optimise it, and report the resulting network.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// AIGER design to read (`.aag` or `.aig`)
    design: PathBuf,

    /// The abc executable used for transformations
    #[arg(long, default_value = "abc")]
    abc: PathBuf,

    /// Optimisation to run after reading
    #[arg(long, value_enum, default_value_t = Recipe::Compress2rs)]
    recipe: Recipe,

    /// Print every node of the final network
    #[arg(long)]
    nodes: bool,

    /// Write the final network as a Graphviz digraph
    #[arg(long)]
    dot: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Recipe {
    Compress2rs,
    Balance,
    Resub,
    Rewrite,
    Refactor,
    None,
}

fn optimise(session: &mut Session<Frame>, recipe: Recipe) -> aigsnap::Result<()> {
    match recipe {
        Recipe::Compress2rs => session.compress2rs(),
        Recipe::Balance => session.balance(Balance { l: true, ..Balance::default() }),
        Recipe::Resub => session.resub(Resub { k: Some(6), l: true, ..Resub::default() }),
        Recipe::Rewrite => session.rewrite(Rewrite { l: true, z: false }),
        Recipe::Refactor => session.refactor(Refactor { l: true, ..Refactor::default() }),
        Recipe::None => Ok(()),
    }
}

fn print_nodes(session: &Session<Frame>) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for index in 0..session.num_nodes() {
        let node = session.aig_node(index);
        write!(out, "{:>6} {:<18}", index, node.node_type().to_string())?;
        if node.has_fanin0() {
            write!(out, " {}", node.fanin0())?;
        }
        if node.has_fanin1() {
            write!(out, " {}", node.fanin1())?;
        }
        writeln!(out, " -> {:?}", node.fanouts())?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).init();

    let mut session = Session::new(Frame::new(FrameConfig::default().with_abc(cli.abc.clone())));
    session.start().context("failed to start the engine")?;

    session
        .read(&cli.design)
        .with_context(|| format!("failed to read {}", cli.design.display()))?;
    println!("before: {}", session.aig_stats()?);

    optimise(&mut session, cli.recipe).context("optimisation failed")?;
    if let Some(runtime) = session.last_runtime() {
        info!("optimisation took {:.3}s", runtime.as_secs_f64());
    }
    println!("after:  {}", session.aig_stats()?);

    if cli.nodes {
        print_nodes(&session)?;
    }

    if let Some(path) = &cli.dot {
        let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        if let Some(snapshot) = session.snapshot() {
            snapshot.to_graphviz(&mut writer)?;
        }
        writer.flush()?;
    }

    session.stop();
    Ok(())
}
