use std::io::{self, BufReader, Write};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: veiljvm <class-file>");
        return ExitCode::FAILURE;
    };

    println!("Starting JVM...");
    let _ = io::stdout().flush();
    std::thread::sleep(Duration::from_millis(200));

    let result = run(&path);

    std::thread::sleep(Duration::from_millis(200));

    match result {
        Ok(()) => {
            print!("JVM has been executed");
            let _ = io::stdout().flush();
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("err: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> Result<(), veiljvm::VmError> {
    let buffer = std::fs::read(path)?;
    let mut stdout = io::stdout();
    let mut stdin = BufReader::new(io::stdin());
    veiljvm::run(&buffer, &mut stdout, &mut stdin)
}
