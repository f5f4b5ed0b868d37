//! Gate-level RISC-V emulator CLI (spec.md §6.1).
//!
//! Assembles a source file into 32-bit machine words, optionally writes the
//! hex word stream, and — unless `--assemble_only` is given — runs it on
//! the single-cycle datapath until the program counter runs off the end of
//! loaded instruction memory.

use std::{fs, process};

use clap::Parser;

use riscv_sim::assembler::Assembler;
use riscv_sim::config::{RunConfig, Trace};
use riscv_sim::core::cpu::{Cpu, StepOutcome};
use riscv_sim::stats::SimStats;

/// `riscv-sim <source> [flags]` (spec.md §6.1).
#[derive(Parser, Debug)]
#[command(author, version, about = "Gate-level RISC-V RV32IMF emulator")]
struct Args {
    /// Assembly source file.
    source: String,

    /// Do not execute; only write hex output.
    #[arg(long)]
    assemble_only: bool,

    /// Destination for assembled hex (one word per line, upper-case,
    /// LSB-byte-first).
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Suppress per-cycle trace.
    #[arg(long)]
    dont_show_steps: bool,

    /// After each cycle, dump touched memory pages.
    #[arg(long)]
    show_memory: bool,

    /// Log each memory read.
    #[arg(long)]
    show_reads: bool,

    /// Log each memory write.
    #[arg(long)]
    show_writes: bool,

    /// Print each format's decoded immediate per cycle.
    #[arg(long)]
    show_immediate_values: bool,

    /// Dump both register files after each cycle.
    #[arg(long)]
    show_registers: bool,

    /// Dump the integer register file after each cycle.
    #[arg(long)]
    show_rv32i_registers: bool,

    /// Dump the FP register file after each cycle.
    #[arg(long)]
    show_rv32f_registers: bool,
}

fn main() {
    let args = Args::parse();

    let source = match fs::read_to_string(&args.source) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: could not read '{}': {err}", args.source);
            process::exit(1);
        }
    };

    let config = RunConfig::default();

    let hex = match Assembler::assemble(&source, config.start_address) {
        Ok(hex) => hex,
        Err(err) => {
            eprintln!("assembly error: {err}");
            process::exit(1);
        }
    };

    if let Some(path) = &args.output {
        if let Err(err) = fs::write(path, hex.join("\n") + "\n") {
            eprintln!("error: could not write '{path}': {err}");
            process::exit(1);
        }
    } else {
        for line in &hex {
            println!("{line}");
        }
    }

    if args.assemble_only {
        return;
    }

    let words = match Assembler::assemble_words(&source, config.start_address) {
        Ok(words) => words,
        Err(err) => {
            eprintln!("assembly error: {err}");
            process::exit(1);
        }
    };

    let trace = Trace {
        show_steps: !args.dont_show_steps,
        show_memory: args.show_memory,
        show_reads: args.show_reads,
        show_writes: args.show_writes,
        show_immediate_values: args.show_immediate_values,
        show_registers: args.show_registers,
        show_rv32i_registers: args.show_rv32i_registers,
        show_rv32f_registers: args.show_rv32f_registers,
    };

    let mut cpu = Cpu::new(&config);
    cpu.load_program(words);
    let mut stats = SimStats::default();

    loop {
        match cpu.step(&trace, &mut stats) {
            Ok(StepOutcome::Executed) => continue,
            Ok(StepOutcome::Halted) => break,
            Err(err) => {
                eprintln!("runtime error: {err}");
                stats.print();
                process::exit(1);
            }
        }
    }

    stats.print();
}
