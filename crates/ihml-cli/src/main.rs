use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Parser)]
#[command(name = "ihml")]
#[command(about = "IHML — indentation-structured markup to HTML compiler")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile an .ihml file to an HTML document
    Build {
        /// Input .ihml file
        path: String,

        /// Destination for the generated HTML
        #[arg(short, long, default_value = "index.html")]
        output: String,
    },

    /// Check an .ihml file for errors without writing output
    Check {
        /// Input .ihml file
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Build { path, output } => cmd_build(&path, &output),
        Command::Check { path } => cmd_check(&path),
    }
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn cmd_build(path: &str, output: &str) {
    let source = read_source(path);

    // First error wins: nothing is written unless the whole compile succeeds
    let html = match ihml_compiler::compile(&source) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::write(output, &html) {
        eprintln!("Error writing {output}: {e}");
        std::process::exit(1);
    }

    eprintln!("Built: {output}");
}

fn cmd_check(path: &str) {
    let source = read_source(path);

    if let Err(e) = ihml_compiler::compile(&source) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    eprintln!("OK: {path}");
}
