use std::fs;
use std::io::{self, BufRead, Write};
use std::process;

use clap::{Parser as ClapParser, Subcommand};
use colored::Colorize;

use opal::analyzer::Analyzer;
use opal::ast;
use opal::environment;
use opal::evaluator::Evaluator;
use opal::generator;
use opal::ir;
use opal::lexer::{Lexer, TokenKind};
use opal::parser::Parser;

#[derive(ClapParser)]
#[command(name = "opal", about = "The Opal language compiler and interpreter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze and evaluate an Opal file
    Run { file: String },
    /// Compile an Opal file to Java source
    Build {
        file: String,
        /// Write output here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
    /// Interactive REPL
    Repl,
}

fn main() {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Run { file } => cmd_run(file),
        Commands::Build { file, output } => cmd_build(file, output.as_deref()),
        Commands::Repl => cmd_repl(),
    }
}

fn read_file(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}", format!("Cannot open file '{}': {}", path, e).red());
            process::exit(1);
        }
    }
}

fn parse_source(source: &str) -> Result<ast::Source, String> {
    let tokens = Lexer::new(source).lex().map_err(|e| e.to_string())?;
    Parser::new(tokens).parse().map_err(|e| e.to_string())
}

fn analyze_source(source: &ast::Source) -> Result<ir::Source, String> {
    Analyzer::new(environment::root_analysis_scope())
        .analyze(source)
        .map_err(|e| e.to_string())
}

fn cmd_run(file: &str) {
    let source = read_file(file);
    let ast = match parse_source(&source) {
        Ok(ast) => ast,
        Err(e) => {
            eprintln!("{}", e.red());
            process::exit(1);
        }
    };

    // Analysis gates evaluation: an ill-typed program never runs.
    if let Err(e) = analyze_source(&ast) {
        eprintln!("{}", e.red());
        process::exit(1);
    }

    let mut evaluator = Evaluator::new(environment::root_evaluation_scope());
    if let Err(e) = evaluator.evaluate(&ast) {
        eprintln!("{}", e.to_string().red());
        process::exit(1);
    }
}

fn cmd_build(file: &str, output: Option<&str>) {
    let source = read_file(file);
    let ir = match parse_source(&source).and_then(|ast| analyze_source(&ast)) {
        Ok(ir) => ir,
        Err(e) => {
            eprintln!("{}", e.red());
            process::exit(1);
        }
    };

    let java = generator::generate(&ir);
    match output {
        None => println!("{}", java),
        Some(path) => {
            if let Err(e) = fs::write(path, java) {
                eprintln!("{}", format!("Cannot write '{}': {}", path, e).red());
                process::exit(1);
            }
            println!("{}", format!("Wrote {}", path).green());
        }
    }
}

// ─── REPL ────────────────────────────────────────────────────────────────────

/// Input is incomplete while a DO block is unclosed or the last token is
/// not a statement terminator.
fn is_incomplete(source: &str) -> bool {
    let Ok(tokens) = Lexer::new(source).lex() else {
        return false;
    };

    let mut depth = 0i64;
    for token in &tokens {
        if token.kind == TokenKind::Identifier {
            match token.literal.as_str() {
                "DO" => depth += 1,
                "END" => depth -= 1,
                _ => {}
            }
        }
    }
    if depth > 0 {
        return true;
    }

    match tokens.last() {
        Some(last) => last.literal != ";" && last.literal != "END",
        None => false,
    }
}

fn cmd_repl() {
    let mut analyzer = Analyzer::new(environment::root_analysis_scope());
    let mut evaluator = Evaluator::new(environment::root_evaluation_scope());
    let mut buffer: Vec<String> = Vec::new();

    println!("Opal REPL (:quit to exit)");
    let stdin = io::stdin();

    loop {
        let prompt = if buffer.is_empty() { "opal> " } else { "...   " };
        print!("{}", prompt);
        io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(_) => break,
        }
        let line = line.trim_end().to_string();

        if buffer.is_empty() && line.trim() == ":quit" {
            break;
        }

        buffer.push(line.clone());
        let source = buffer.join("\n");
        if source.trim().is_empty() {
            buffer.clear();
            continue;
        }
        if is_incomplete(&source) && !line.trim().is_empty() {
            continue;
        }
        buffer.clear();

        let ast = match parse_source(&source) {
            Ok(ast) => ast,
            Err(e) => {
                eprintln!("{}", e.red());
                continue;
            }
        };
        if let Err(e) = analyzer.analyze(&ast) {
            eprintln!("{}", e.to_string().red());
            continue;
        }
        match evaluator.evaluate(&ast) {
            Ok(value) => println!("{}", value),
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }
}
