use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use lc3vm::console::{RawModeGuard, StdinKeySource};
use lc3vm::debugger::RustylineSource;
use lc3vm::error::StartupError;
use lc3vm::runstate::RunState;
use lc3vm::Vm;

fn main() -> ExitCode {
    env_logger::init();

    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(StartupError::Usage) => {
            eprintln!("usage: lc3vm <image> [<image> ...]");
            ExitCode::from(2)
        }
        Err(err @ StartupError::Load(_)) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
        Err(err @ StartupError::Resource(_)) => {
            eprintln!("{err}");
            ExitCode::from(71)
        }
    }
}

fn try_main() -> Result<(), StartupError> {
    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        return Err(StartupError::Usage);
    }

    let mut vm = Vm::new();
    for path in &paths {
        let origin = vm.load_image(path)?;
        log::info!("loaded {} at origin 0x{:04X}", path.display(), origin);
    }

    let run = vm.run.clone();
    ctrlc::set_handler(move || {
        let state = run.interrupt();
        if state == RunState::Step {
            println!("\n^C -- entering single-step mode");
        }
    })
    .map_err(|e| StartupError::Resource(io::Error::new(io::ErrorKind::Other, e)))?;

    let _raw_mode = RawModeGuard::acquire().map_err(StartupError::Resource)?;
    let mut lines = RustylineSource::new().map_err(|e| {
        StartupError::Resource(io::Error::new(io::ErrorKind::Other, e))
    })?;

    let mut keys = StdinKeySource;
    let mut stdout = io::stdout();
    vm.run(&mut keys, &mut stdout, &mut lines)
        .map_err(StartupError::Resource)?;

    Ok(())
}
