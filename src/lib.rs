//! LC-3 emulator core: fetch/decode/execute engine, memory-mapped keyboard,
//! object-image loader, and the tri-state run controller driving an
//! interactive single-step debugger.

pub mod bits;
pub mod console;
pub mod cpu;
pub mod debugger;
pub mod error;
pub mod instructions;
pub mod loader;
pub mod memory;
pub mod registers;
pub mod runstate;

use std::io::{self, Write};
use std::path::Path;

use cpu::{Cpu, StepOutcome};
use debugger::{run_repl, LineSource, ReplAction};
use error::LoadError;
use memory::KeySource;
use runstate::{RunController, RunState};

/// Owns the whole machine: registers, memory, and the run-state handle a
/// console-interrupt handler shares. Encapsulated in one value (rather than
/// process globals) so multiple independent VMs can coexist, e.g. in tests.
pub struct Vm {
    pub cpu: Cpu,
    pub run: RunController,
}

impl Vm {
    pub fn new() -> Self {
        Vm {
            cpu: Cpu::new(),
            run: RunController::new(),
        }
    }

    pub fn load_image(&mut self, path: &Path) -> Result<u16, LoadError> {
        loader::load_image(&mut self.cpu.memory, path)
    }

    /// The main fetch loop (§2). Runs while the run state is not OFF. In
    /// STEP state the debugger REPL runs before each fetch; in TURBO state
    /// instructions execute back to back until a halt, an illegal opcode, or
    /// the console interrupt drops the state back to STEP or OFF.
    pub fn run(&mut self, keys: &mut dyn KeySource, out: &mut dyn Write, lines: &mut dyn LineSource) -> io::Result<()> {
        loop {
            match self.run.get() {
                RunState::Off => return Ok(()),
                RunState::Step => {
                    // peek, not fetch: the banner must not move PC or trip the
                    // keyboard hook before the operator decides step/continue.
                    let pc_before = self.cpu.regs.pc;
                    let word = self.cpu.memory.peek(pc_before);
                    match run_repl(lines, &self.run, &self.cpu, pc_before, word) {
                        ReplAction::Quit => return Ok(()),
                        ReplAction::Resume => {}
                    }
                    if self.run.get() == RunState::Off {
                        return Ok(());
                    }
                    let (_, _, instr) = self.cpu.fetch(keys);
                    let (outcome, trace) = self.cpu.execute(instr, keys, out)?;
                    if self.run.get() == RunState::Step {
                        println!("{trace}");
                    }
                    if matches!(outcome, StepOutcome::Halted | StepOutcome::Illegal { .. }) {
                        self.run.set(RunState::Off);
                        return Ok(());
                    }
                }
                RunState::Turbo => {
                    let (_, _, instr) = self.cpu.fetch(keys);
                    let (outcome, _) = self.cpu.execute(instr, keys, out)?;
                    match outcome {
                        StepOutcome::Halted | StepOutcome::Illegal { .. } => {
                            self.run.set(RunState::Off);
                            return Ok(());
                        }
                        StepOutcome::Continue => {}
                    }
                }
            }
        }
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}
