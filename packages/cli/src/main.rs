//! oslab - Banker's Algorithm Front End
//!
//! Thin presentation collaborator over `oslab-banker`: parses
//! space-separated resource vectors, feeds the engine, and prints the
//! allocation table, the safety verdict, and - for unsafe states -
//! the wait-for graph. Free-text parsing lives here on purpose;
//! nothing non-numeric ever crosses the engine boundary.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use oslab_banker::{BankerEngine, SafetyResult, StepRecorder, WaitForEdge};

#[derive(Parser)]
#[command(name = "oslab")]
#[command(about = "Step-by-step Banker's Algorithm simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a snapshot given as command-line vectors
    Run {
        /// Total system resources, space-separated (e.g. "10 5 7")
        #[arg(short, long)]
        total: String,
        /// Process as "max demand / allocation" (e.g. "7 5 3 / 0 1 0");
        /// repeat once per process
        #[arg(short, long = "process")]
        processes: Vec<String>,
        /// Replay the algorithm's recorded steps
        #[arg(long)]
        trace: bool,
        /// Emit the full result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run the textbook five-process example
    Demo {
        /// Replay the algorithm's recorded steps
        #[arg(long)]
        trace: bool,
        /// Emit the full result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            total,
            processes,
            trace,
            json,
        } => {
            let mut engine = BankerEngine::new();
            engine.set_total_resources(&parse_vector(&total)?)?;
            for spec in &processes {
                let (max_demand, allocation) = parse_process_spec(spec)?;
                let id = engine.add_process(&max_demand, &allocation)?;
                debug!(process = %id, "admitted");
            }
            report(engine, trace, json)
        }
        Commands::Demo { trace, json } => {
            let mut engine = BankerEngine::new();
            engine.set_total_resources(&[10, 5, 7])?;
            engine.add_process(&[7, 5, 3], &[0, 1, 0])?;
            engine.add_process(&[3, 2, 2], &[2, 0, 0])?;
            engine.add_process(&[9, 0, 2], &[3, 0, 2])?;
            engine.add_process(&[2, 2, 2], &[2, 1, 1])?;
            engine.add_process(&[4, 3, 3], &[0, 0, 2])?;
            report(engine, trace, json)
        }
    }
}

/// Parse "10 5 7" into raw amounts. Sign and shape validation is the
/// engine's job; only numeric parsing happens here.
fn parse_vector(input: &str) -> Result<Vec<i64>> {
    input
        .split_whitespace()
        .map(|token| {
            token
                .parse::<i64>()
                .with_context(|| format!("'{}' is not a number", token))
        })
        .collect()
}

/// Parse "7 5 3 / 0 1 0" into (max demand, allocation).
fn parse_process_spec(spec: &str) -> Result<(Vec<i64>, Vec<i64>)> {
    let parts: Vec<&str> = spec.split('/').collect();
    if parts.len() != 2 {
        bail!("process spec '{}' must be 'max demand / allocation'", spec);
    }
    Ok((parse_vector(parts[0])?, parse_vector(parts[1])?))
}

fn report(mut engine: BankerEngine, show_trace: bool, json: bool) -> Result<()> {
    let result = engine.evaluate();
    let edges = engine.wait_for_graph(&result);

    if json {
        let payload = serde_json::json!({
            "total": engine.registry().total(),
            "available": engine.registry().available(),
            "processes": engine.registry().processes(),
            "result": result,
            "wait_for_edges": edges,
            "trace": engine.trace(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print_table(&engine);
    print_verdict(&result, &edges);
    if show_trace {
        if let Some(trace) = engine.trace() {
            print_trace(trace);
        }
    }
    Ok(())
}

fn print_table(engine: &BankerEngine) {
    let registry = engine.registry();
    println!("Total:     {}", registry.total());
    println!("Available: {}", registry.available());
    println!();
    println!(
        "{:<6} {:<12} {:<12} {:<12} {}",
        "Proc", "Max", "Alloc", "Need", "Status"
    );
    for process in registry.processes() {
        println!(
            "{:<6} {:<12} {:<12} {:<12} {:?}",
            process.id.to_string(),
            process.max_demand.to_string(),
            process.allocation.to_string(),
            process.need().to_string(),
            process.status,
        );
    }
    println!();
}

fn print_verdict(result: &SafetyResult, edges: &[WaitForEdge]) {
    match result {
        SafetyResult::Safe { sequence } => {
            let rendered: Vec<String> = sequence.iter().map(ToString::to_string).collect();
            println!("SAFE - safe sequence: {}", rendered.join(" -> "));
        }
        SafetyResult::Unsafe { finished } => {
            let rendered: Vec<String> = finished.iter().map(ToString::to_string).collect();
            println!(
                "UNSAFE - only [{}] can be shown to finish",
                rendered.join(", ")
            );
            println!("Wait-for graph:");
            for edge in edges {
                println!(
                    "  {} -> {}  (blocked on resource {})",
                    edge.from, edge.to, edge.resource
                );
            }
        }
    }
}

fn print_trace(trace: &StepRecorder) {
    println!();
    println!("Trace ({} steps):", trace.len());
    for (i, step) in trace.steps().iter().enumerate() {
        println!("  {:>3}. [work {}] {}", i + 1, step.work, step.message);
    }
}
