// DIY Lisp interactive REPL and program runner

use anyhow::Context;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::{info, warn};
use yansi::Paint;

use diylisp::input_handling::{read_input_content, validate_input_args, InputConfig, InputSource};
use diylisp::{parse_multiple, Interpreter, InterpreterConfig};

use input_buffer::InputBuffer;

#[derive(Parser, Debug)]
#[command(name = "diylisp-repl")]
#[command(about = "DIY Lisp interpreter with an interactive REPL")]
struct Args {
    /// Input source type
    #[arg(short, long, value_enum, default_value_t = InputSource::Interactive)]
    input: InputSource,

    /// Input string (when using --input string)
    #[arg(short, long)]
    string: Option<String>,

    /// Input file path (when using --input file)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Path to interpreter configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start without evaluating the prelude
    #[arg(long)]
    no_prelude: bool,

    /// Maximum nesting of function calls
    #[arg(long)]
    max_recursion_depth: Option<usize>,

    /// Print the parsed program as JSON instead of evaluating it
    #[arg(long)]
    dump_ast: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Load the config file if one was given; command line flags take precedence.
    fn interpreter_config(&self) -> anyhow::Result<InterpreterConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let config = InterpreterConfig::from_file(path)?;
                info!("Loaded interpreter configuration from: {}", path.display());
                config
            }
            None => InterpreterConfig::default(),
        };

        if self.no_prelude {
            config.load_prelude = false;
        }
        if let Some(depth) = self.max_recursion_depth {
            config.max_recursion_depth = depth;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose { "diylisp=debug" } else { "diylisp=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = args.interpreter_config()?;

    if args.input == InputSource::Interactive {
        let interpreter = Interpreter::new(config)?;
        return run_interactive_repl(&interpreter);
    }

    validate_input_args(args.input, &args.file, &args.string)?;
    let input_config = match args.input {
        InputSource::File => InputConfig::from_file(args.file.clone().unwrap_or_default()),
        InputSource::String => InputConfig::from_string(args.string.clone().unwrap_or_default()),
        _ => InputConfig::from_pipe(),
    };
    let input = read_input_content(&input_config)?;

    if args.dump_ast {
        let nodes = parse_multiple(&input.content)
            .with_context(|| format!("failed to parse {}", input.source_name))?;
        println!("{}", serde_json::to_string_pretty(&nodes)?);
        return Ok(());
    }

    let interpreter = Interpreter::new(config)?;
    let value = interpreter
        .interpret(&input.content)
        .with_context(|| format!("failed to run {}", input.source_name))?;
    println!("{}", value);
    Ok(())
}

fn run_interactive_repl(interpreter: &Interpreter) -> anyhow::Result<()> {
    println!("{}", "DIY Lisp REPL".bold());
    println!("Type :help for commands, :quit or Ctrl-D to exit.");
    println!();

    let mut rl = DefaultEditor::new()?;
    let history_file = interpreter.config().history_file.clone();
    if let Some(path) = &history_file {
        if rl.load_history(path).is_err() {
            warn!("No previous history at {}", path.display());
        }
    }

    let prompt = interpreter.config().prompt.clone();
    let mut buffer = InputBuffer::default();

    loop {
        let current_prompt = if buffer.is_empty() { prompt.as_str() } else { "..  " };
        match rl.readline(current_prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if buffer.is_empty() && trimmed.starts_with(':') {
                    if !handle_repl_command(trimmed, interpreter) {
                        break;
                    }
                    continue;
                }

                let input = match buffer.push_line(&line) {
                    Some(input) => input,
                    None => continue,
                };
                let _ = rl.add_history_entry(input.trim());
                match interpreter.interpret(&input) {
                    Ok(value) => println!("{}", value.to_string().green()),
                    Err(e) => println!("{}", e.to_string().red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                buffer.discard();
                println!("^C");
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(path) = &history_file {
        if let Err(e) = rl.save_history(path) {
            warn!("Could not save history to {}: {}", path.display(), e);
        }
    }
    println!("Bye!");
    Ok(())
}

/// Returns false when the REPL should exit.
fn handle_repl_command(command: &str, interpreter: &Interpreter) -> bool {
    match command {
        ":quit" | ":q" | ":exit" => return false,
        ":help" | ":h" => show_help(),
        ":env" => {
            let names = interpreter.environment().symbol_names();
            println!("{}", names.join(" "));
        }
        other => println!("{}", format!("Unknown command {} (try :help)", other).yellow()),
    }
    true
}

fn show_help() {
    println!("Enter an expression to evaluate it. Unbalanced input continues on the next line.");
    println!();
    println!("  :env    list every bound name");
    println!("  :help   show this help");
    println!("  :quit   exit the REPL");
}

// Kept in its own module: `yansi::Paint` also has a `clear` method.
mod input_buffer {
    /// Collects REPL lines until the parentheses balance.
    #[derive(Debug, Default)]
    pub struct InputBuffer {
        pending: String,
    }

    impl InputBuffer {
        pub fn is_empty(&self) -> bool {
            self.pending.is_empty()
        }

        /// Appends a line. Returns the complete input once it is balanced and non-blank.
        pub fn push_line(&mut self, line: &str) -> Option<String> {
            if !self.pending.is_empty() {
                self.pending.push('\n');
            }
            self.pending.push_str(line);
            if paren_balance(&self.pending) > 0 {
                return None;
            }
            let input = std::mem::take(&mut self.pending);
            if input.trim().is_empty() {
                None
            } else {
                Some(input)
            }
        }

        /// Drops a partially entered expression.
        pub fn discard(&mut self) {
            String::clear(&mut self.pending);
        }
    }

    /// Open minus close parens, ignoring `;` comments.
    pub fn paren_balance(source: &str) -> i64 {
        source
            .lines()
            .map(|line| line.split(';').next().unwrap_or(""))
            .flat_map(str::chars)
            .map(|c| match c {
                '(' => 1,
                ')' => -1,
                _ => 0,
            })
            .sum()
    }

}
