//! Single-cycle datapath driver (spec.md §4.11).
//!
//! Wires together the control unit, ALU-control, integer ALU, M-extension
//! multiply/divide unit, FPU, both register files, data memory, and
//! instruction memory into one fetch/decode/execute/memory/writeback cycle
//! per [`Cpu::step`] call.

use crate::common::ExecError;
use crate::config::{RunConfig, Trace};
use crate::stats::SimStats;

use super::alu::{Alu, MulDiv, MulDivOp};
use super::alu_control;
use super::control;
use super::fpu::Fpu;
use super::instruction_memory::{InstructionMemory, Pc};
use super::memory::MemoryUnit;
use super::register_file::RegisterFile;

/// Whether a cycle executed an instruction or found the end-of-program
/// sentinel.
#[derive(Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Executed,
    Halted,
}

/// The full machine: PC, instruction memory, both register files, and data
/// memory, plus whatever state a single `step()` call needs to thread
/// through the cycle.
pub struct Cpu {
    pub pc: Pc,
    pub imem: InstructionMemory,
    pub dmem: MemoryUnit,
    pub int_rf: RegisterFile,
    pub fp_rf: RegisterFile,
}

impl Cpu {
    pub fn new(config: &RunConfig) -> Self {
        Cpu {
            pc: Pc::new(config.start_address),
            imem: InstructionMemory::new(),
            dmem: MemoryUnit::new(config.memory_ceiling),
            int_rf: RegisterFile::new_integer(),
            fp_rf: RegisterFile::new_float(),
        }
    }

    pub fn load_program(&mut self, words: Vec<u32>) {
        self.imem.load(words);
    }

    /// Runs one cycle: fetch, decode, execute, memory, writeback, next-PC.
    /// Returns [`StepOutcome::Halted`] without touching any state other
    /// than observing the sentinel when the program has run off the end
    /// of loaded instruction memory.
    pub fn step(
        &mut self,
        trace: &Trace,
        stats: &mut SimStats,
    ) -> Result<StepOutcome, ExecError> {
        let pc_val = self.pc.get();
        let Some(instr) = self.imem.fetch(pc_val) else {
            return Ok(StepOutcome::Halted);
        };

        let opcode = instr & 0x7F;
        let rd = (instr >> 7) & 0x1F;
        let funct3 = (instr >> 12) & 0x7;
        let rs1 = (instr >> 15) & 0x1F;
        let rs2 = (instr >> 20) & 0x1F;
        let funct7 = (instr >> 25) & 0x7F;

        let signals = control::decode(opcode).ok_or(ExecError::UnknownOpcode { pc: pc_val, opcode })?;

        let i_imm = control::imm_i(instr);
        let s_imm = control::imm_s(instr);
        let b_imm = control::imm_b(instr);
        let u_imm = control::imm_u(instr);
        let j_imm = control::imm_j(instr);

        if trace.show_immediate_values {
            println!(
                "pc={pc_val:#010x} imm_i={i_imm:#010x} imm_s={s_imm:#010x} imm_b={b_imm:#010x} imm_u={u_imm:#010x} imm_j={j_imm:#010x}"
            );
        }

        // Register read. Write data isn't known until after the compute and
        // memory stages below, so the reads here use the plain combinational
        // read port; the write each file commits this cycle is applied once,
        // at the writeback stage, through `RegisterFile::update` (spec.md
        // §4.3's named read1/read2/write contract).
        let (rs1_val, rs2_val) = if signals.fp_reg_read {
            (self.fp_rf.read(rs1), self.fp_rf.read(rs2))
        } else if signals.reg_file_sel {
            (self.int_rf.read(rs1), self.fp_rf.read(rs2))
        } else {
            (self.int_rf.read(rs1), self.int_rf.read(rs2))
        };

        // ALU input select (spec.md §4.11 step 5), with an explicit jump
        // case reusing the adder for the PC+4 return-address value so
        // writeback for JAL/JALR flows through the same "compute result"
        // path as every other instruction.
        let (operand1, operand2) = if opcode == control::OP_LUI {
            (0u32, u_imm)
        } else if opcode == control::OP_AUIPC {
            (pc_val, u_imm)
        } else if signals.jump {
            (pc_val, 4u32)
        } else if opcode == control::OP_STORE || opcode == control::OP_FSW {
            (rs1_val, s_imm)
        } else if opcode == control::OP_FLW {
            (rs1_val, i_imm)
        } else if signals.alu_src {
            (rs1_val, i_imm)
        } else {
            (rs1_val, rs2_val)
        };

        let mut zero = false;
        let compute_result: u32 = if signals.fpu_op {
            let (result, _flags) = match funct7 {
                0b0000000 => Fpu::add(operand1, operand2),
                0b0000100 => Fpu::sub(operand1, operand2),
                0b0001000 => Fpu::mul(operand1, operand2),
                other => return Err(ExecError::UnsupportedFpuOp(other as u8)),
            };
            result
        } else if opcode == control::OP_R && funct7 == 0b0000001 {
            let op = match funct3 {
                0b000 => MulDivOp::Mul,
                0b001 => MulDivOp::Mulh,
                0b010 => MulDivOp::Mulhsu,
                0b011 => MulDivOp::Mulhu,
                0b100 => MulDivOp::Div,
                0b101 => MulDivOp::Divu,
                0b110 => MulDivOp::Rem,
                _ => MulDivOp::Remu,
            };
            MulDiv::update(op, operand1, operand2)
        } else {
            let is_imm = opcode == control::OP_I;
            let funct7_bit30 = (instr >> 30) & 1 == 1;
            let alu_op = alu_control::resolve(signals.alu_op, funct3, funct7_bit30, is_imm)
                .map_err(|_| ExecError::UnsupportedFunct { pc: pc_val, opcode, funct3, funct7 })?;
            let (z, result) = Alu::update(alu_op, operand1, operand2);
            zero = z;
            result
        };

        // Memory (spec.md §4.11 step 7).
        let mut mem_value = 0u32;
        if signals.mem_read {
            let addr = compute_result;
            mem_value = if opcode == control::OP_FLW {
                self.dmem.read_word(addr)?
            } else {
                match funct3 {
                    0b000 => (self.dmem.read_byte(addr)? as i8) as u32,
                    0b001 => (self.dmem.read_half(addr)? as i16) as u32,
                    0b010 => self.dmem.read_word(addr)?,
                    0b100 => self.dmem.read_byte(addr)? as u32,
                    0b101 => self.dmem.read_half(addr)? as u32,
                    other => {
                        return Err(ExecError::UnsupportedFunct { pc: pc_val, opcode, funct3: other, funct7 })
                    }
                }
            };
            if trace.show_reads {
                println!("read  mem[{addr:#010x}] = {mem_value:#010x}");
            }
        }
        if signals.mem_write {
            let addr = compute_result;
            if opcode == control::OP_FSW {
                self.dmem.write_word(addr, rs2_val)?;
            } else {
                match funct3 {
                    0b000 => self.dmem.write_byte(addr, rs2_val as u8)?,
                    0b001 => self.dmem.write_half(addr, rs2_val as u16)?,
                    0b010 => self.dmem.write_word(addr, rs2_val)?,
                    other => {
                        return Err(ExecError::UnsupportedFunct { pc: pc_val, opcode, funct3: other, funct7 })
                    }
                }
            }
            if trace.show_writes {
                println!("write mem[{addr:#010x}] = {rs2_val:#010x}");
            }
        }

        // Writeback (spec.md §4.11 steps 8-9). Each register file commits
        // through exactly one `update` call per cycle; the read ports it
        // returns are discarded here since the operands were already read
        // above, and at most one of the two calls has `write_enable` set.
        let writeback = if signals.fp_mem_to_reg || signals.mem_to_reg {
            mem_value
        } else {
            compute_result
        };
        self.int_rf.update(rs1, rs2, rd, writeback, signals.reg_write);
        self.fp_rf.update(rs1, rs2, rd, writeback, signals.fp_reg_write);

        // Next PC (spec.md §4.11 step 10): JAL and JALR are distinct paths.
        let pc_plus4 = pc_val.wrapping_add(4);
        let pc_branch = pc_val.wrapping_add(b_imm);
        let branch_taken = signals.branch && zero;
        let candidate = if branch_taken { pc_branch } else { pc_plus4 };
        let next_pc = if signals.jump {
            if opcode == control::OP_JALR {
                rs1_val.wrapping_add(i_imm) & !1u32
            } else {
                pc_val.wrapping_add(j_imm)
            }
        } else {
            candidate
        };
        self.pc.set(next_pc);

        self.tally(stats, opcode, funct7);
        if trace.show_steps {
            println!("cycle {:>6} pc={:#010x} instr={:#010x}", stats.cycles, pc_val, instr);
        }
        if trace.show_registers || trace.show_rv32i_registers {
            self.report_int_registers();
        }
        if trace.show_registers || trace.show_rv32f_registers {
            self.report_fp_registers();
        }
        if trace.show_memory {
            self.report_memory();
        }

        Ok(StepOutcome::Executed)
    }

    fn tally(&self, stats: &mut SimStats, opcode: u32, funct7: u32) {
        stats.cycles += 1;
        stats.instructions_retired += 1;
        match opcode {
            control::OP_LOAD => stats.inst_load += 1,
            control::OP_STORE => stats.inst_store += 1,
            control::OP_BRANCH => stats.inst_branch += 1,
            control::OP_JAL | control::OP_JALR => stats.inst_jump += 1,
            control::OP_SYSTEM | control::OP_FENCE => stats.inst_system += 1,
            control::OP_FLW => stats.inst_fp_load += 1,
            control::OP_FSW => stats.inst_fp_store += 1,
            control::OP_FP => stats.inst_fp_arith += 1,
            control::OP_R if funct7 == 0b0000001 => stats.inst_alu += 1,
            _ => stats.inst_alu += 1,
        }
    }

    fn report_int_registers(&self) {
        print!("x:");
        for i in 0..32u32 {
            print!(" x{i}={:#010x}", self.int_rf.read(i));
        }
        println!();
    }

    fn report_fp_registers(&self) {
        print!("f:");
        for i in 0..32u32 {
            print!(" f{i}={:#010x}", self.fp_rf.read(i));
        }
        println!();
    }

    fn report_memory(&self) {
        for (addr, byte) in self.dmem.touched_pages() {
            println!("mem[{addr:#010x}] = {byte:#04x}");
        }
    }
}
