//! The single-step debugger: fetch banner, first-letter command dispatch,
//! register dump, and the post-step trace line (§4.9).

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::cpu::Cpu;
use crate::runstate::{RunController, RunState};

const PROMPT: &str = "(lc3vm) ";

const HELP: &str = "\
Commands:
  h, help     show this help
  c, continue run at full speed until halt or the next interrupt
  s, step     execute one instruction, then prompt again
  r, reg      print R0..R7, PC, and the condition code
  m, memory   display memory (reserved, currently a no-op)
";

/// Supplies lines to the REPL. `None` means operator EOF.
pub trait LineSource {
    fn readline(&mut self, prompt: &str) -> Option<String>;
}

/// Real `LineSource` backed by `rustyline`, with up to 1024 history entries.
pub struct RustylineSource {
    editor: DefaultEditor,
}

impl RustylineSource {
    pub fn new() -> rustyline::Result<Self> {
        let mut editor = DefaultEditor::new()?;
        editor.history_mut().set_max_len(1024)?;
        Ok(RustylineSource { editor })
    }
}

impl LineSource for RustylineSource {
    fn readline(&mut self, prompt: &str) -> Option<String> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Some(line)
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => None,
            Err(_) => None,
        }
    }
}

/// Outcome of one REPL entry: either the operator chose step/continue (and
/// the run controller has already been updated), or they quit.
pub enum ReplAction {
    Resume,
    Quit,
}

/// Print the fetch banner (pre-increment PC and the raw instruction word)
/// and run the command loop until `step` or `continue` is chosen.
pub fn run_repl(
    lines: &mut dyn LineSource,
    run: &RunController,
    cpu: &Cpu,
    pc_before: u16,
    word: u16,
) -> ReplAction {
    println!("PC=0x{pc_before:04X}  instr=0x{word:04X}");
    loop {
        let line = match lines.readline(PROMPT) {
            Some(line) => line,
            None => {
                run.set(RunState::Off);
                return ReplAction::Quit;
            }
        };
        let mut words = line.split_whitespace();
        match words.next() {
            Some(cmd) if cmd.starts_with('h') => print!("{HELP}"),
            Some(cmd) if cmd.starts_with('c') => {
                run.set(RunState::Turbo);
                return ReplAction::Resume;
            }
            Some(cmd) if cmd.starts_with('s') => return ReplAction::Resume,
            Some(cmd) if cmd.starts_with('r') => print!("{}\n", cpu.regs),
            Some(cmd) if cmd.starts_with('m') => {
                // reserved: "display N words of memory from address A" (§4.9, unimplemented)
            }
            Some(other) => println!("unrecognized command: {other}"),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedLines(VecDeque<Option<String>>);

    impl LineSource for ScriptedLines {
        fn readline(&mut self, _prompt: &str) -> Option<String> {
            self.0.pop_front().flatten()
        }
    }

    #[test]
    fn step_command_resumes_without_changing_state() {
        let run = RunController::new();
        let cpu = Cpu::new();
        let mut lines = ScriptedLines(VecDeque::from([Some("s".to_string())]));
        let action = run_repl(&mut lines, &run, &cpu, 0x3000, 0x1234);
        assert!(matches!(action, ReplAction::Resume));
        assert_eq!(run.get(), RunState::Step);
    }

    #[test]
    fn continue_command_sets_turbo() {
        let run = RunController::new();
        let cpu = Cpu::new();
        let mut lines = ScriptedLines(VecDeque::from([Some("continue".to_string())]));
        let action = run_repl(&mut lines, &run, &cpu, 0x3000, 0x1234);
        assert!(matches!(action, ReplAction::Resume));
        assert_eq!(run.get(), RunState::Turbo);
    }

    #[test]
    fn eof_quits_and_sets_off() {
        let run = RunController::new();
        let cpu = Cpu::new();
        let mut lines = ScriptedLines(VecDeque::from([None]));
        let action = run_repl(&mut lines, &run, &cpu, 0x3000, 0x1234);
        assert!(matches!(action, ReplAction::Quit));
        assert_eq!(run.get(), RunState::Off);
    }

    #[test]
    fn unrecognized_command_reprompts_then_steps() {
        let run = RunController::new();
        let cpu = Cpu::new();
        let mut lines = ScriptedLines(VecDeque::from([
            Some("zzz".to_string()),
            Some("s".to_string()),
        ]));
        let action = run_repl(&mut lines, &run, &cpu, 0x3000, 0x1234);
        assert!(matches!(action, ReplAction::Resume));
    }
}
