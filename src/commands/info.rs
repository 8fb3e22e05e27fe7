use std::io::{self, Write};

pub fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} --eval=<PROGRAM> [OPTIONS]   # Run Brainfuck code given inline
  {0} --file=<PATH>    [OPTIONS]   # Run Brainfuck code loaded from PATH

Options:
  --file,  -f <PATH>     Load the program from PATH
  --eval,  -e <PROGRAM>  Run PROGRAM given on the command line
  --size,  -s <CELLS>    Tape capacity in cells (default 30000)
  --debug, -d            Print a step-by-step table of operations instead of executing
  --max-steps <N>        Abort after N steps
  --timeout <MS>         Abort after MS milliseconds of wall-clock time
  --verbose, -v          Log engine activity to stderr
  --about                Describe the language and the engine
  --version, -V          Print version
  --help,  -h            Show this help

Flags accept either `--name value` or `--name=value`.

Notes:
- Input (`,`) reads a single byte from stdin; on EOF or a read error the current cell is set to 0.
- Bytes outside of Brainfuck's ><+-.,[] are comments and are skipped.

Examples:
- Load Brainfuck code from a file:
    {0} --file=./program.bf
- Read bytes from a file as stdin (`,` will consume file input):
    {0} --eval=",[.,]" < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

pub fn about_and_exit() -> ! {
    println!(
        r#"bf {version}
{description}

The machine is a tape of unsigned byte cells (30000 by default) and a head
that starts at cell 0. Eight instructions drive it:

  >  move the head right         <  move the head left
  +  increment the cell (wraps)  -  decrement the cell (wraps)
  .  write the cell to stdout    ,  read one byte from stdin into the cell
  [  skip past the matching ] if the cell is 0
  ]  jump back to the matching [ if the cell is not 0

Brackets are linked before the program starts; an unbalanced program is
rejected without running. Moving the head off either end of the tape stops
the program with an error that names the failing instruction."#,
        version = env!("CARGO_PKG_VERSION"),
        description = env!("CARGO_PKG_DESCRIPTION"),
    );
    let _ = io::stdout().flush();
    std::process::exit(0);
}

pub fn version_and_exit() -> ! {
    println!("bf {}", env!("CARGO_PKG_VERSION"));
    let _ = io::stdout().flush();
    std::process::exit(0);
}
