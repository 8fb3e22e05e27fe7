use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

use clap::Args;

use crate::cli_util::{print_engine_error, print_notice};
use crate::commands::info;
use crate::config::{self, Settings};
use crate::loader::load_program;
use crate::{Diagnostics, Engine, EngineError, StepControl};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Load the program from PATH
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Run the given program text
    #[arg(short = 'e', long = "eval", value_name = "PROGRAM", allow_hyphen_values = true)]
    pub eval: Option<String>,

    /// Tape capacity in cells (fallback BF_TAPE_SIZE; default 30000)
    #[arg(short = 's', long = "size", value_name = "CELLS")]
    pub size: Option<usize>,

    /// Print a step-by-step table of operations instead of executing
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Maximum interpreter steps before abort (fallback BF_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<u64>,

    /// Wall-clock timeout in milliseconds (fallback BF_TIMEOUT_MS; default none)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    let RunArgs {
        file,
        eval,
        size,
        debug: debug_table,
        max_steps,
        timeout_ms,
    } = args;

    let code: Vec<u8> = match (file, eval) {
        (None, None) => info::usage_and_exit(program, 2),
        (Some(_), Some(_)) => {
            eprintln!("{program}: cannot use --eval together with --file");
            info::usage_and_exit(program, 2);
        }
        (Some(path), None) => match load_program(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{program}: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        },
        (None, Some(text)) => text.into_bytes(),
    };

    let Settings {
        tape_size,
        max_steps,
        timeout_ms,
    } = config::settings().resolve(size, max_steps, timeout_ms);
    tracing::debug!(tape_size, ?max_steps, ?timeout_ms, debug_table, "resolved settings");

    let cancel = Arc::new(AtomicBool::new(false));
    let handler_flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.store(true, Ordering::Relaxed)) {
        tracing::warn!("failed to set ctrl+c handler: {e}");
    }

    let mut engine = match Engine::try_with_capacity(tape_size) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("{program}: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };
    engine.set_control(StepControl::new(max_steps, cancel.clone()));

    let exit_code = match timeout_ms {
        None => {
            let (result, diagnostics) = execute(&mut engine, &code, debug_table);
            report(program, &code, result, &diagnostics)
        }
        Some(ms) => run_with_deadline(program, engine, code, debug_table, ms, cancel),
    };

    let _ = io::stdout().flush();
    exit_code
}

/// Execute on a worker thread; raise the cancel flag if `ms` elapses first.
fn run_with_deadline(
    program: &str,
    mut engine: Engine,
    code: Vec<u8>,
    debug: bool,
    ms: u64,
    cancel: Arc<AtomicBool>,
) -> i32 {
    let (tx, rx) = mpsc::channel::<(Result<(), EngineError>, Diagnostics)>();
    let program_owned = code.clone();

    thread::spawn(move || {
        let outcome = execute(&mut engine, &program_owned, debug);
        let _ = tx.send(outcome);
    });

    match rx.recv_timeout(Duration::from_millis(ms)) {
        Ok((result, diagnostics)) => report(program, &code, result, &diagnostics),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            cancel.store(true, Ordering::Relaxed);
            let _ = io::stdout().flush();
            print_notice(&format!(
                "Execution aborted: wall-clock timeout exceeded ({ms} ms)"
            ));
            1
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => 1,
    }
}

/// Stdio handles stay unlocked so the deadline path can still flush stdout
/// while a worker is mid-run.
fn execute(engine: &mut Engine, code: &[u8], debug: bool) -> (Result<(), EngineError>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let result = if debug {
        engine.eval_debug(code, io::stdout(), Some(&mut diagnostics))
    } else {
        engine.eval(code, io::stdin(), io::stdout(), Some(&mut diagnostics))
    };
    (result, diagnostics)
}

fn report(
    program: &str,
    code: &[u8],
    result: Result<(), EngineError>,
    diagnostics: &Diagnostics,
) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            // Keep already-produced program output ahead of the error text.
            let _ = io::stdout().flush();
            print_engine_error(Some(program), code, diagnostics, &err);
            1
        }
    }
}
