//! Simulation statistics collection and reporting.
//!
//! A single-cycle, non-pipelined, non-cached core retires exactly one
//! instruction per cycle, so `cycles == instructions_retired` always holds;
//! this struct exists to report instruction mix and host-side throughput,
//! not to model stalls or a memory hierarchy that doesn't exist here.

use std::time::Instant;

/// Simulation statistics structure tracking cycle/instruction counts and
/// instruction-category mix.
pub struct SimStats {
    start_time: Instant,
    pub cycles: u64,
    pub instructions_retired: u64,

    pub inst_load: u64,
    pub inst_store: u64,
    pub inst_branch: u64,
    pub inst_jump: u64,
    pub inst_alu: u64,
    pub inst_system: u64,

    pub inst_fp_load: u64,
    pub inst_fp_store: u64,
    pub inst_fp_arith: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            inst_jump: 0,
            inst_alu: 0,
            inst_system: 0,
            inst_fp_load: 0,
            inst_fp_store: 0,
            inst_fp_arith: 0,
        }
    }
}

impl SimStats {
    /// Prints a formatted summary of the run: host time, cycle/instruction
    /// counts, and the instruction-category mix.
    pub fn print(&self) {
        let duration = self.start_time.elapsed();
        let seconds = duration.as_secs_f64();

        let instr = self.instructions_retired.max(1) as f64;
        let mips = if seconds > 0.0 {
            (self.instructions_retired as f64 / seconds) / 1_000_000.0
        } else {
            0.0
        };

        println!("\n==========================================================");
        println!("RISC-V SINGLE-CYCLE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {:.4} s", seconds);
        println!("cycles                   {}", self.cycles);
        println!("instructions_retired     {}", self.instructions_retired);
        println!("host_mips                {:.2}", mips);
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        let pct = |count: u64| (count as f64 / instr) * 100.0;
        println!("  op.alu                 {} ({:.2}%)", self.inst_alu, pct(self.inst_alu));
        println!("  op.load                {} ({:.2}%)", self.inst_load, pct(self.inst_load));
        println!("  op.store               {} ({:.2}%)", self.inst_store, pct(self.inst_store));
        println!("  op.branch              {} ({:.2}%)", self.inst_branch, pct(self.inst_branch));
        println!("  op.jump                {} ({:.2}%)", self.inst_jump, pct(self.inst_jump));
        println!("  op.system              {} ({:.2}%)", self.inst_system, pct(self.inst_system));
        println!("  op.fp_load             {} ({:.2}%)", self.inst_fp_load, pct(self.inst_fp_load));
        println!("  op.fp_store            {} ({:.2}%)", self.inst_fp_store, pct(self.inst_fp_store));
        println!("  op.fp_arith            {} ({:.2}%)", self.inst_fp_arith, pct(self.inst_fp_arith));
        println!("==========================================================");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_counters_are_zero() {
        let stats = SimStats::default();
        assert_eq!(stats.cycles, 0);
        assert_eq!(stats.instructions_retired, 0);
    }
}
