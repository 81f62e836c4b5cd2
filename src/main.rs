use clap::{Parser as ClapParser, Subcommand};
use querytree::cli::{self, CheckOptions, CheckResult, CliError, RenderOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "querytree")]
#[command(about = "querytree - Inspect database-agnostic query documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the SQL-like text form of a JSON query
    Render {
        /// The JSON query (reads --input or stdin if not provided)
        query: Option<String>,

        /// File containing the JSON query
        #[arg(short, long)]
        input: Option<String>,

        /// One clause per line
        #[arg(short, long)]
        pretty: bool,

        /// Flatten nested AND/OR/XOR groups first
        #[arg(long)]
        simplify: bool,
    },

    /// Check a JSON query against backend limits
    Check {
        /// The JSON query (reads --input or stdin if not provided)
        query: Option<String>,

        /// File containing the JSON query
        #[arg(short, long)]
        input: Option<String>,

        /// Maximum number of joins
        #[arg(long)]
        max_joins: Option<usize>,

        /// Maximum nesting of AND/OR/XOR groups
        #[arg(long)]
        max_depth: Option<usize>,

        /// Maximum operands in one AND/OR/XOR group
        #[arg(long)]
        max_operands: Option<usize>,

        /// Operator the backend cannot translate (repeatable)
        #[arg(long)]
        deny: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            query,
            input,
            pretty,
            simplify,
        } => run_render(query, input, pretty, simplify),
        Commands::Check {
            query,
            input,
            max_joins,
            max_depth,
            max_operands,
            deny,
        } => run_check(query, input, max_joins, max_depth, max_operands, deny),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_render(
    query: Option<String>,
    input: Option<String>,
    pretty: bool,
    simplify: bool,
) -> Result<(), CliError> {
    let options = RenderOptions {
        input: read_input(query, input)?,
        pretty,
        simplify,
    };
    println!("{}", cli::execute_render(&options)?);
    Ok(())
}

fn run_check(
    query: Option<String>,
    input: Option<String>,
    max_joins: Option<usize>,
    max_depth: Option<usize>,
    max_operands: Option<usize>,
    deny: Vec<String>,
) -> Result<(), CliError> {
    let options = CheckOptions {
        input: read_input(query, input)?,
        max_joins,
        max_depth,
        max_operands,
        deny,
    };

    match cli::execute_check(&options)? {
        CheckResult::Accepted(kind) => println!("ok ({})", kind),
        CheckResult::Rejected(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
    Ok(())
}

/// The query argument, else the `--input` file, else piped stdin.
fn read_input(query: Option<String>, input: Option<String>) -> Result<Option<String>, CliError> {
    if query.is_some() {
        return Ok(query);
    }
    match input {
        Some(path) => Ok(Some(std::fs::read_to_string(path)?)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}
