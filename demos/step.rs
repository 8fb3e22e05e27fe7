use std::io;

use bf_engine::{Engine, JumpTable, Status};

fn main() {
    // Drive the engine one instruction at a time and watch the head and cell.
    let code = b"++[->+<]";
    let table = match JumpTable::build(code) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let mut engine = Engine::with_capacity(4);
    let (mut input, mut output) = (io::empty(), io::sink());

    loop {
        let pc = engine.pc();
        match engine.step(code, &table, &mut input, &mut output) {
            Ok(Status::Halted) if pc >= code.len() => break,
            Ok(_) => {
                let tape = engine.tape();
                println!(
                    "pc={pc:<2} op={} head={} cells={:?}",
                    code[pc] as char,
                    tape.current_address(),
                    tape.cells()
                );
            }
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    }
}
