use bf_engine::Engine;

fn main() {
    // Example: demonstrate debug mode (no real I/O; prints a step-by-step table)
    // Program: move pointer right, increment, then move left and output (suppressed in debug)
    let code = b">+.<";

    let mut engine = Engine::with_capacity(8);

    if let Err(err) = engine.eval_debug(code, std::io::stdout(), None) {
        eprintln!("Brainfuck interpreter error: {err}");
        std::process::exit(1);
    }
}
