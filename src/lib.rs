//! A bounded-tape Brainfuck execution engine.
//!
//! This crate runs programs for the eight-instruction tape language on a
//! fixed-capacity memory tape (default 30,000 cells) with a single head.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0; cell arithmetic wraps at 8 bits.
//! - Strict head bounds: moving left from cell 0 or right past the end
//!   returns an error naming the failing instruction.
//! - Input `,` reads a single byte; on EOF or a read error the current cell is set to 0.
//! - Output `.` writes the byte at the current cell to the output sink.
//! - Brackets are linked by a pre-pass; unmatched brackets are reported before
//!   anything runs.
//! - Every other byte is a comment.
//!
//! Quick start:
//!
//! ```
//! use bf_engine::{Diagnostics, Engine};
//!
//! let code = b"++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>++++++++++++.------------.<-.<.+++.------.--------.>>+.";
//! let mut engine = Engine::new();
//! let mut out = Vec::new();
//! let mut diagnostics = Diagnostics::new();
//! engine
//!     .eval(code, std::io::empty(), &mut out, Some(&mut diagnostics))
//!     .expect("program should run");
//! assert_eq!(out, b"Hello, World!");
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod jump_table;
pub mod loader;
pub mod tape;
pub mod theme;

pub use diagnostics::{Diagnostics, report};
pub use engine::{Engine, Status, StepControl};
pub use error::{BracketKind, EngineError, LoadError, TapeError};
pub use jump_table::JumpTable;
pub use loader::load_program;
pub use tape::{DEFAULT_TAPE_SIZE, Tape};
