//! Fetch-decode-execute loop over a [`Tape`] and a [`JumpTable`].
//!
//! Features and behaviors:
//! - Memory tape initialized to 0 (30,000 cells unless built with a custom size).
//! - Strict head bounds: moving left from cell 0 or right past the end
//!   returns an error.
//! - Input `,` reads a single byte from the input source; on exhaustion or a
//!   read error the current cell is set to 0 and execution continues.
//! - Output `.` writes the current cell to the output sink; a failed write
//!   aborts the run.
//! - Nested loops `[]` jump through a table built before the first step;
//!   unmatched brackets are reported before anything executes.
//! - Any other byte is a comment and is skipped.

use std::io::{self, Read, Write};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::diagnostics::{Diagnostics, report};
use crate::error::{EngineError, TapeError};
use crate::jump_table::JumpTable;
use crate::tape::Tape;

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone, Debug, Default)]
pub struct StepControl {
    pub max_steps: Option<u64>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<u64>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }
}

/// Whether the program counter has reached the end of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
}

/// A Brainfuck execution engine.
///
/// The engine owns:
/// - a fixed-capacity memory tape initialized to zeros,
/// - the program counter of the current run,
/// - an optional [`StepControl`] consulted between steps.
///
/// The tape persists across calls to [`eval`](Self::eval); use
/// [`reset`](Self::reset) for a fresh machine.
#[derive(Debug, Default)]
pub struct Engine {
    tape: Tape,
    pc: usize,
    steps: u64,
    control: Option<StepControl>,
}

impl Engine {
    /// Create an engine with the default 30,000-cell tape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with a custom tape capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tape: Tape::new(capacity),
            pc: 0,
            steps: 0,
            control: None,
        }
    }

    /// Create an engine with a custom tape capacity, failing if the tape
    /// cannot be allocated.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TapeError> {
        Ok(Self {
            tape: Tape::try_new(capacity)?,
            pc: 0,
            steps: 0,
            control: None,
        })
    }

    pub fn set_control(&mut self, control: StepControl) {
        self.control = Some(control);
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Steps executed since the last evaluation started.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Zero the tape and rewind the program counter.
    pub fn reset(&mut self) {
        self.tape.reset();
        self.pc = 0;
        self.steps = 0;
    }

    /// Execute exactly one instruction of `program` at the current pc.
    ///
    /// Returns [`Status::Halted`] once pc has reached the end of the program,
    /// without executing anything.
    pub fn step<R: Read, W: Write>(
        &mut self,
        program: &[u8],
        table: &JumpTable,
        input: &mut R,
        output: &mut W,
    ) -> Result<Status, EngineError> {
        let ip = self.pc;
        let Some(&instr) = program.get(ip) else {
            return Ok(Status::Halted);
        };
        let tape_err = |source: TapeError| EngineError::Tape { ip, source };

        match instr {
            b'>' => self.tape.shift_right().map_err(tape_err)?,
            b'<' => self.tape.shift_left().map_err(tape_err)?,
            b'+' => self.tape.increment().map_err(tape_err)?,
            b'-' => self.tape.decrement().map_err(tape_err)?,
            b'.' => {
                let byte = self.tape.read().map_err(tape_err)?;
                output
                    .write_all(&[byte])
                    .map_err(|source| EngineError::Output { ip, source })?;
            }
            b',' => {
                let byte = read_byte(input);
                self.tape.write(byte).map_err(tape_err)?;
            }
            b'[' => {
                if self.tape.read().map_err(tape_err)? == 0 {
                    self.pc = self.jump_target(table, ip, '[')?;
                    self.steps += 1;
                    return Ok(self.status(program));
                }
            }
            b']' => {
                if self.tape.read().map_err(tape_err)? != 0 {
                    self.pc = self.jump_target(table, ip, ']')?;
                    self.steps += 1;
                    return Ok(self.status(program));
                }
            }
            _ => {}
        }

        self.pc += 1;
        self.steps += 1;
        Ok(self.status(program))
    }

    /// Link `program`'s brackets, then run it to completion.
    ///
    /// Any failure is recorded into `diagnostics` (when given) before it is
    /// returned.
    pub fn eval<R: Read, W: Write>(
        &mut self,
        program: &[u8],
        input: R,
        output: W,
        mut diagnostics: Option<&mut Diagnostics>,
    ) -> Result<(), EngineError> {
        let table = match JumpTable::build(program) {
            Ok(table) => table,
            Err(err) => {
                tracing::debug!(ip = err.ip(), "rejected program: {err}");
                report(err.diagnostic(), err.ip(), diagnostics.as_deref_mut());
                return Err(err);
            }
        };
        self.eval_with_table(program, &table, input, output, diagnostics)
    }

    /// Run `program` against a jump table the caller already built for it.
    pub fn eval_with_table<R: Read, W: Write>(
        &mut self,
        program: &[u8],
        table: &JumpTable,
        input: R,
        output: W,
        diagnostics: Option<&mut Diagnostics>,
    ) -> Result<(), EngineError> {
        self.execute(program, table, input, output, None, diagnostics)
    }

    /// Debug-run `program`, writing a step-by-step table of operations to
    /// `trace` instead of producing I/O side effects. The tape and pc advance
    /// exactly as they would during a real run, but:
    /// - '.' does not emit anything; the action is logged instead
    /// - ',' sees an exhausted input and sets the cell to 0
    pub fn eval_debug<T: Write>(
        &mut self,
        program: &[u8],
        mut trace: T,
        mut diagnostics: Option<&mut Diagnostics>,
    ) -> Result<(), EngineError> {
        let trace: &mut dyn Write = &mut trace;
        let table = match JumpTable::build(program) {
            Ok(table) => table,
            Err(err) => {
                report(err.diagnostic(), err.ip(), diagnostics.as_deref_mut());
                return Err(err);
            }
        };
        self.execute(
            program,
            &table,
            io::empty(),
            io::sink(),
            Some(trace),
            diagnostics,
        )
    }

    /// Internal executor shared by the plain and debug runs.
    fn execute<R: Read, W: Write>(
        &mut self,
        program: &[u8],
        table: &JumpTable,
        mut input: R,
        mut output: W,
        mut trace: Option<&mut dyn Write>,
        diagnostics: Option<&mut Diagnostics>,
    ) -> Result<(), EngineError> {
        self.pc = 0;
        self.steps = 0;
        tracing::debug!(
            len = program.len(),
            capacity = self.tape.capacity(),
            pairs = table.pairs(),
            "starting evaluation"
        );

        if let Some(t) = trace.as_deref_mut() {
            if let Err(source) = write_trace_header(t) {
                return Err(self.fail(EngineError::Output { ip: 0, source }, diagnostics));
            }
        }

        while self.pc < program.len() {
            if let Err(err) = self.check_control() {
                return Err(self.fail(err, diagnostics));
            }

            let ip = self.pc;
            let instr = program[ip];
            let (ptr_before, cell_before) = (self.tape.current_address(), self.tape.read().ok());

            if let Err(err) = self.step(program, table, &mut input, &mut output) {
                return Err(self.fail(err, diagnostics));
            }
            tracing::trace!(ip, op = %(instr as char), head = self.tape.current_address(), "step");

            if let Some(t) = trace.as_deref_mut() {
                let row = self.describe(instr, ptr_before, cell_before.unwrap_or(0));
                if let Err(source) = writeln!(
                    t,
                    "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
                    self.steps - 1,
                    ip,
                    ptr_before,
                    cell_before.unwrap_or(0),
                    printable(instr),
                    row
                ) {
                    return Err(self.fail(EngineError::Output { ip, source }, diagnostics));
                }
            }
        }

        if let Err(source) = output.flush() {
            let ip = self.pc;
            return Err(self.fail(EngineError::Output { ip, source }, diagnostics));
        }
        tracing::debug!(steps = self.steps, "evaluation finished");
        Ok(())
    }

    fn check_control(&self) -> Result<(), EngineError> {
        let Some(ctrl) = self.control.as_ref() else {
            return Ok(());
        };
        if ctrl.cancel_flag.load(Ordering::Relaxed) {
            return Err(EngineError::Canceled { ip: self.pc });
        }
        if let Some(max) = ctrl.max_steps {
            if self.steps >= max {
                return Err(EngineError::StepLimitExceeded { ip: self.pc, limit: max });
            }
        }
        Ok(())
    }

    fn jump_target(&self, table: &JumpTable, ip: usize, op: char) -> Result<usize, EngineError> {
        table.get(ip).ok_or(EngineError::UnmappedJump { ip, op })
    }

    fn status(&self, program: &[u8]) -> Status {
        if self.pc >= program.len() {
            Status::Halted
        } else {
            Status::Running
        }
    }

    fn fail(&self, err: EngineError, diagnostics: Option<&mut Diagnostics>) -> EngineError {
        tracing::debug!(ip = err.ip(), steps = self.steps, "evaluation failed: {err}");
        report(err.diagnostic(), err.ip(), diagnostics);
        err
    }

    /// Action column of the debug table, derived from the state after a step.
    fn describe(&self, instr: u8, ptr_before: usize, cell_before: u8) -> String {
        let head = self.tape.current_address();
        let cell = self.tape.read().unwrap_or(0);
        match instr {
            b'>' | b'<' => format!("Moved pointer head to index {head}"),
            b'+' => format!("Increment cell[{ptr_before}] from {cell_before} to {cell}"),
            b'-' => format!("Decrement cell[{ptr_before}] from {cell_before} to {cell}"),
            b'.' => format!("Output byte '{}' (suppressed in debug)", cell as char),
            b',' => "Read byte -> simulated EOF (set cell to 0)".to_string(),
            b'[' if cell_before == 0 => {
                format!("Cell is 0; jump forward to matching ']' at IP {}", self.pc)
            }
            b'[' => "Enter loop (cell != 0)".to_string(),
            b']' if cell_before != 0 => {
                format!("Cell != 0; jump back to matching '[' at IP {}", self.pc)
            }
            b']' => "Exit loop (cell is 0)".to_string(),
            _ => "Skip comment".to_string(),
        }
    }
}

/// Read exactly one byte; exhaustion and read errors both yield 0.
fn read_byte<R: Read>(input: &mut R) -> u8 {
    let mut buf = [0u8; 1];
    match input.read(&mut buf) {
        Ok(0) => 0,
        Ok(_) => buf[0],
        Err(e) => {
            tracing::debug!("input read failed, substituting 0: {e}");
            0
        }
    }
}

fn write_trace_header(t: &mut dyn Write) -> io::Result<()> {
    writeln!(t, "STEP | IP  | PTR | CELL | INSTR | ACTION")?;
    writeln!(
        t,
        "-----+-----+-----+------+-------+------------------------------------------------"
    )
}

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() { byte as char } else { '?' }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BracketKind;

    const HELLO: &str = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>++++++++++++.------------.<-.<.+++.------.--------.>>+.";

    fn run(code: &str, capacity: usize, input: &[u8]) -> (Engine, Result<(), EngineError>, Vec<u8>) {
        let mut engine = Engine::with_capacity(capacity);
        let mut out = Vec::new();
        let result = engine.eval(code.as_bytes(), input, &mut out, None);
        (engine, result, out)
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("source broken"))
        }
    }

    #[test]
    fn hello_world_prints_exactly_thirteen_bytes() {
        let (_, result, out) = run(HELLO, 30_000, b"");
        assert!(result.is_ok());
        assert_eq!(out, b"Hello, World!");
    }

    #[test]
    fn input_echo_is_traceable_cell_by_cell() {
        // , . , > . , .
        // A: cell0=A, out A, cell0=B, head 1, out 0, input exhausted -> cell1=0, out 0
        let (engine, result, out) = run(",.,>.,.", 4, b"AB");
        assert!(result.is_ok());
        assert_eq!(out, vec![b'A', 0, 0]);
        assert_eq!(&engine.tape().cells()[..2], &[b'B', 0]);

        let (engine, _, out) = run(",.,>.,.", 4, b"ABC");
        assert_eq!(out, vec![b'A', 0, b'C']);
        assert_eq!(&engine.tape().cells()[..2], &[b'B', b'C']);
    }

    #[test]
    fn comments_are_skipped() {
        let (engine, result, _) = run("a+b+c // two", 1, b"");
        assert!(result.is_ok());
        assert_eq!(engine.tape().read().unwrap(), 2);
    }

    #[test]
    fn unmatched_open_bracket_fails_before_running() {
        let mut engine = Engine::with_capacity(10);
        let mut d = Diagnostics::new();
        let result = engine.eval(b"+[+", &b""[..], io::sink(), Some(&mut d));
        assert!(matches!(
            result,
            Err(EngineError::UnbalancedJump { ip: 1, kind: BracketKind::Open })
        ));
        assert_eq!(d.index(), Some(1));
        assert_eq!(engine.tape().read().unwrap(), 0, "nothing executed");
    }

    #[test]
    fn left_pointer_out_of_bounds_errors() {
        let (_, result, _) = run("+<", 10, b"");
        assert!(matches!(
            result,
            Err(EngineError::Tape { ip: 1, source: TapeError::RangeUnderflow })
        ));
    }

    #[test]
    fn right_pointer_out_of_bounds_errors() {
        // With 3 cells (0..=2), the 3rd '>' attempts to move beyond index 2.
        let (engine, result, _) = run(">>>", 3, b"");
        assert!(matches!(
            result,
            Err(EngineError::Tape { ip: 2, source: TapeError::RangeOverflow { .. } })
        ));
        assert_eq!(engine.pc(), 2);
    }

    #[test]
    fn zero_capacity_engine_fails_on_first_access() {
        let mut d = Diagnostics::new();
        let mut engine = Engine::with_capacity(0);
        let result = engine.eval(b"x+", &b""[..], io::sink(), Some(&mut d));
        assert!(matches!(
            result,
            Err(EngineError::Tape { ip: 1, source: TapeError::Write })
        ));
        assert_eq!(d.index(), Some(1));
        assert!(d.message().contains("empty tape"));
    }

    #[test]
    fn try_with_capacity_reports_unallocatable_tape() {
        assert!(matches!(
            Engine::try_with_capacity(usize::MAX),
            Err(TapeError::Allocation { capacity: usize::MAX })
        ));
        let engine = Engine::try_with_capacity(3).unwrap();
        assert_eq!(engine.tape().capacity(), 3);
    }

    #[test]
    fn empty_loop_on_zero_cell_is_ok() {
        let (_, result, _) = run("[]", 10, b"");
        assert!(result.is_ok());
    }

    #[test]
    fn loop_clears_cell() {
        let (engine, result, _) = run("+++[-]", 10, b"");
        assert!(result.is_ok());
        assert_eq!(engine.tape().read().unwrap(), 0);
    }

    #[test]
    fn skipped_loop_lands_on_loop_end() {
        let program = b"[+]+";
        let table = JumpTable::build(program).unwrap();
        let mut engine = Engine::with_capacity(1);
        let (mut input, mut output) = (io::empty(), io::sink());
        assert_eq!(engine.step(program, &table, &mut input, &mut output).unwrap(), Status::Running);
        assert_eq!(engine.pc(), 2);
        engine.step(program, &table, &mut input, &mut output).unwrap();
        assert_eq!(engine.pc(), 3);
        assert_eq!(engine.step(program, &table, &mut input, &mut output).unwrap(), Status::Halted);
        assert_eq!(engine.tape().read().unwrap(), 1);
        assert_eq!(engine.step(program, &table, &mut input, &mut output).unwrap(), Status::Halted);
        assert_eq!(engine.steps(), 3);
    }

    #[test]
    fn bracket_without_table_entry_is_unmapped() {
        let program = b"+[]";
        let table = JumpTable::build(b"+++").unwrap();
        let mut engine = Engine::with_capacity(1);
        let (mut input, mut output) = (io::empty(), io::sink());
        engine.step(program, &table, &mut input, &mut output).unwrap();
        engine.step(program, &table, &mut input, &mut output).unwrap();
        let err = engine.step(program, &table, &mut input, &mut output).unwrap_err();
        assert!(matches!(err, EngineError::UnmappedJump { ip: 2, op: ']' }));
    }

    #[test]
    fn output_failure_is_fatal() {
        let mut d = Diagnostics::new();
        let mut engine = Engine::with_capacity(1);
        let result = engine.eval(b"+.+", &b""[..], FailingWriter, Some(&mut d));
        assert!(matches!(result, Err(EngineError::Output { ip: 1, .. })));
        assert_eq!(d.index(), Some(1));
        assert_eq!(engine.tape().read().unwrap(), 1);
    }

    #[test]
    fn input_failure_substitutes_zero() {
        let mut engine = Engine::with_capacity(1);
        let mut out = Vec::new();
        engine.eval(b"+++,.", FailingReader, &mut out, None).unwrap();
        assert_eq!(out, vec![0]);
    }

    #[test]
    fn step_limit_stops_infinite_loop() {
        let mut engine = Engine::with_capacity(1);
        engine.set_control(StepControl::new(Some(50), Arc::new(AtomicBool::new(false))));
        let mut d = Diagnostics::new();
        let result = engine.eval(b"+[]", &b""[..], io::sink(), Some(&mut d));
        assert!(matches!(result, Err(EngineError::StepLimitExceeded { limit: 50, .. })));
        assert_eq!(engine.steps(), 50);
        assert!(d.message().contains("step limit exceeded (50)"));
    }

    #[test]
    fn raised_cancel_flag_stops_before_first_step() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut engine = Engine::with_capacity(1);
        engine.set_control(StepControl::new(None, flag));
        let result = engine.eval(b"+", &b""[..], io::sink(), None);
        assert!(matches!(result, Err(EngineError::Canceled { ip: 0 })));
        assert_eq!(engine.tape().read().unwrap(), 0);
    }

    #[test]
    fn cached_table_can_be_reused() {
        let program = b"+[->+<]";
        let table = JumpTable::build(program).unwrap();
        let mut engine = Engine::with_capacity(2);
        engine.eval_with_table(program, &table, io::empty(), io::sink(), None).unwrap();
        engine.reset();
        engine.eval_with_table(program, &table, io::empty(), io::sink(), None).unwrap();
        assert_eq!(engine.tape().cells(), &[0, 1]);
    }

    #[test]
    fn tape_persists_between_evals_until_reset() {
        let mut engine = Engine::with_capacity(1);
        engine.eval(b"++", io::empty(), io::sink(), None).unwrap();
        engine.eval(b"+", io::empty(), io::sink(), None).unwrap();
        assert_eq!(engine.tape().read().unwrap(), 3);
        engine.reset();
        assert_eq!(engine.tape().read().unwrap(), 0);
        assert_eq!(engine.pc(), 0);
    }

    #[test]
    fn debug_run_prints_table_without_io() {
        let mut engine = Engine::with_capacity(4);
        let mut trace = Vec::new();
        engine.eval_debug(b">+.,<", &mut trace, None).unwrap();
        let text = String::from_utf8(trace).unwrap();
        assert!(text.starts_with("STEP | IP"));
        assert!(text.contains("Moved pointer head to index 1"));
        assert!(text.contains("Increment cell[1] from 0 to 1"));
        assert!(text.contains("suppressed in debug"));
        assert!(text.contains("simulated EOF"));
        assert_eq!(text.lines().count(), 2 + 5);
        assert_eq!(engine.tape().cells()[1], 0);
    }
}
