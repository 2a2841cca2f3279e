//! Colloquy CLI - Interactive shell for intent scripts
//!
//! Loads a script file, reports what was compiled, then reads utterances in
//! a loop and forwards them to the interpreter until `quit`/`exit`.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use colloquy::engine::{Interpreter, KeywordClassifier, StdioHost};
use colloquy::script::{self, lexer};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "colloquy")]
#[command(about = "Rule-based conversational intent DSL shell", long_about = None)]
struct Cli {
    /// Script file to load
    script: PathBuf,

    /// Intent classifier to attach
    #[arg(long, value_enum, default_value_t = ClassifierKind::Keyword)]
    classifier: ClassifierKind,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassifierKind {
    /// Local keyword classifier (no external service)
    Keyword,
    /// No classifier; local fallback matching only
    None,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let source = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("cannot read script {:?}", cli.script))?;

    let tokens = lexer::tokenize(&source)
        .with_context(|| format!("lexing failed for {:?}", cli.script))?;
    let program = script::Parser::new(tokens.clone())
        .parse()
        .with_context(|| format!("parsing failed for {:?}", cli.script))?;

    println!(
        "Loaded {:?}: {} tokens, {} intents",
        cli.script,
        tokens.len(),
        program.intents.len()
    );

    let mut interpreter = Interpreter::new(StdioHost);
    if matches!(cli.classifier, ClassifierKind::Keyword) {
        interpreter.set_classifier(Box::new(KeywordClassifier));
    }
    interpreter.load(program);

    println!("Ready. Type your question ('quit' to leave).");

    let stdin = std::io::stdin();
    loop {
        print!("\nyou: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }
        if matches!(utterance.to_lowercase().as_str(), "quit" | "exit") {
            break;
        }

        interpreter.respond(utterance);
    }

    println!("Bye.");
    Ok(())
}
