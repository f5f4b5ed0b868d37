//! Run configuration (spec.md §6.1, SPEC_FULL.md §3.2).
//!
//! Scaled down from a cache/pipeline-tuning config tree to what a
//! single-cycle, non-paged machine actually needs: where the program
//! starts, how big its data address space is, and which trace flags are
//! on. `RunConfig` derives `Deserialize` so a config file can be layered on
//! later without an API break, but the CLI is the only source of truth
//! today — no TOML file is required to run this core.

use serde::Deserialize;

fn default_start_address() -> u32 {
    0
}

fn default_memory_ceiling() -> u32 {
    0x0010_0000 // 1 MiB of byte-addressable data memory.
}

/// Trace flags controlling per-cycle `println!` reporting (SPEC_FULL.md §3.3).
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct Trace {
    pub show_steps: bool,
    pub show_memory: bool,
    pub show_reads: bool,
    pub show_writes: bool,
    pub show_immediate_values: bool,
    pub show_registers: bool,
    pub show_rv32i_registers: bool,
    pub show_rv32f_registers: bool,
}

/// Top-level run configuration: where the program starts, how much data
/// memory it gets, and what to trace.
#[derive(Clone, Debug, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_start_address")]
    pub start_address: u32,
    #[serde(default = "default_memory_ceiling")]
    pub memory_ceiling: u32,
    #[serde(default)]
    pub trace: Trace,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            start_address: default_start_address(),
            memory_ceiling: default_memory_ceiling(),
            trace: Trace::default(),
        }
    }
}
