//! Tomasulo simulator CLI.
//!
//! A single entry point: load an assembly source file, optionally seed
//! memory, then run the engine to completion (or up to a cycle cap) one
//! `step_cycle` at a time, printing per-cycle trace lines and a final
//! statistics report.

use clap::{Parser, Subcommand};
use std::{fs, process};
use tomasim_core::config::Config;
use tomasim_core::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "tomasim",
    author,
    version,
    about = "Cycle-accurate Tomasulo out-of-order execution simulator",
    long_about = "Run a small fixed-ISA assembly program (ADD SUB NAND MUL LOAD STORE BEQ CALL RET) through a Tomasulo engine: reservation stations, a reorder buffer, and a Common Data Bus.\n\nExamples:\n  tomasim run program.asm\n  tomasim run program.asm --mem 0=5,1=10 --trace\n  tomasim run program.asm --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an assembly source file to completion.
    Run {
        /// Path to the assembly source file.
        file: String,

        /// Comma-separated `address=value` memory initializers.
        #[arg(long, value_delimiter = ',')]
        mem: Vec<String>,

        /// Emit a per-cycle trace line via `tracing`.
        #[arg(long)]
        trace: bool,

        /// Stop after this many cycles even if the program has not completed.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Print the final snapshot as JSON instead of the summary report.
        #[arg(long)]
        json: bool,

        /// Reorder buffer capacity override, for probing back-pressure.
        #[arg(long)]
        rob_capacity: Option<usize>,

        /// Only print the named statistics sections (summary, instruction_mix, branch).
        #[arg(long, value_delimiter = ',')]
        stats: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            file,
            mem,
            trace,
            max_cycles,
            json,
            rob_capacity,
            stats,
        } => cmd_run(&file, &mem, trace, max_cycles, json, rob_capacity, &stats),
    }
}

fn cmd_run(
    file: &str,
    mem: &[String],
    trace: bool,
    max_cycles: Option<u64>,
    json: bool,
    rob_capacity: Option<usize>,
    stats_sections: &[String],
) {
    if trace {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .init();
    }

    let source = fs::read_to_string(file).unwrap_or_else(|e| {
        eprintln!("error: could not read '{file}': {e}");
        process::exit(1);
    });

    let mut config = Config::default();
    config.general.trace = trace;
    if let Some(capacity) = rob_capacity {
        config.rob.capacity = capacity;
    }

    let mut sim = Simulator::new(config);
    if let Err(load_err) = sim.load_program(&source) {
        eprintln!("error: program failed to parse:");
        for diag in &load_err.0 {
            eprintln!("  line {}: {}", diag.line, diag.message);
        }
        process::exit(1);
    }

    if let Err(err) = sim.initialize_memory(parse_mem_inits(mem)) {
        eprintln!("error: invalid memory initializer: {err}");
        process::exit(1);
    }

    loop {
        if let Some(limit) = max_cycles {
            if sim.snapshot().cycle >= limit {
                break;
            }
        }
        if sim.is_complete() {
            break;
        }
        let _ = sim.step_cycle();
    }

    let snapshot = sim.snapshot();
    if json {
        match serde_json::to_string_pretty(&snapshot) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: failed to serialize snapshot: {e}");
                process::exit(1);
            }
        }
    } else {
        println!("cycles: {}  complete: {}", snapshot.cycle, snapshot.complete);
        println!("registers: {:?}", snapshot.registers);
        println!("memory: {:?}", snapshot.memory);
        sim.stats().print_sections(stats_sections);
    }
}

fn parse_mem_inits(entries: &[String]) -> Vec<(i64, i64)> {
    entries
        .iter()
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (addr, value) = entry.split_once('=').unwrap_or_else(|| {
                eprintln!("error: malformed --mem entry '{entry}', expected address=value");
                process::exit(1);
            });
            let address: i64 = addr.trim().parse().unwrap_or_else(|_| {
                eprintln!("error: malformed address in --mem entry '{entry}'");
                process::exit(1);
            });
            let value: i64 = value.trim().parse().unwrap_or_else(|_| {
                eprintln!("error: malformed value in --mem entry '{entry}'");
                process::exit(1);
            });
            (address, value)
        })
        .collect()
}
