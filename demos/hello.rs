use std::io;

use bf_engine::{Diagnostics, Engine};

fn main() {
    // Prints "Hello, World!" without a trailing newline
    let code = b"++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>++++++++++++.------------.<-.<.+++.------.--------.>>+.";

    let mut engine = Engine::new();
    let mut diagnostics = Diagnostics::new();

    if let Err(err) = engine.eval(code, io::stdin(), io::stdout(), Some(&mut diagnostics)) {
        eprintln!(
            "{} at instruction {:?}: {err}",
            diagnostics.message(),
            diagnostics.index()
        );
        std::process::exit(1);
    }

    // Print a newline after the program output for readability
    println!();
}
