use bfvm::{BoundsPolicy, Config, EofPolicy, Interpreter, Machine, Program, DEFAULT_TAPE_SIZE};
use clap::Parser;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;
use tracing::{debug, error, Level};

#[derive(Parser, Debug)]
#[command(name = "bfvm")]
#[command(version)]
#[command(about = "Brainfuck interpreter with runtime bracket matching")]
struct Args {
    /// The program file to execute
    #[arg(required = true)]
    file: PathBuf,

    /// Number of cells on the tape
    #[arg(long, default_value_t = DEFAULT_TAPE_SIZE)]
    tape_size: usize,

    /// Behavior when the data pointer leaves the tape
    #[arg(long, value_enum, default_value_t = BoundsPolicy::Fail)]
    bounds: BoundsPolicy,

    /// Behavior of `,` once input is exhausted
    #[arg(long, value_enum, default_value_t = EofPolicy::Unchanged)]
    eof: EofPolicy,

    /// Abort after executing this many instructions
    #[arg(long)]
    step_limit: Option<u64>,

    /// Drop every byte that is not an instruction before running
    #[arg(long)]
    filter: bool,

    /// Enable debug logging and print tape state (repeat for tracing)
    #[arg(short, long, action = clap::ArgAction::Count)]
    debug: u8,
}

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let level = match args.debug {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    // Read source file
    let source = match fs::read(&args.file) {
        Ok(s) => s,
        Err(e) => {
            error!("Error reading file {:?}: {}", args.file, e);
            process::exit(1);
        }
    };
    debug!("Loaded {} bytes from {:?}", source.len(), args.file);

    let program = if args.filter {
        Program::filtered(&source)
    } else {
        Program::new(trim_whitespace(&source))
    };

    let config = Config::default()
        .with_tape_size(args.tape_size)
        .with_bounds(args.bounds)
        .with_eof(args.eof)
        .with_step_limit(args.step_limit);

    if let Err(e) = execute(&program, config, args.debug > 0) {
        error!("Runtime error: {}", e);
        process::exit(1);
    }
}

fn execute(program: &Program, config: Config, dump_tape: bool) -> bfvm::Result<()> {
    let interp = Interpreter::new(config)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut machine = Machine::new(program, interp.config(), stdin.lock(), stdout.lock())?;

    let result = interp.drive(&mut machine);
    if dump_tape {
        let (start, cells) = machine.tape().window(8);
        debug!(
            steps = machine.steps(),
            ip = machine.ip(),
            cursor = machine.tape().cursor(),
            "tape from cell {}: {:?}",
            start,
            cells
        );
    }
    result
}

/// Strips leading and trailing ASCII whitespace, so a trailing newline in
/// the program file is not run as an instruction.
fn trim_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}
