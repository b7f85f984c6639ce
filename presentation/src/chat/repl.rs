//! REPL (Read-Eval-Print Loop) for interactive deliberation

use crate::session::{QueryRunner, SessionError};
use mrce_application::{DeliberationOutcome, ReasoningOracle};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use thiserror::Error;

/// Failures that end the interactive session
#[derive(Error, Debug)]
pub enum ReplError {
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),

    /// A question hit an invariant violation; the session cannot go on
    #[error(transparent)]
    Fatal(SessionError),
}

/// What a line typed at the prompt asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput<'a> {
    Quit,
    Help,
    ShowHints,
    Unknown(&'a str),
    Question(&'a str),
}

impl<'a> ReplInput<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line.to_lowercase().as_str() {
            "" | "q" | "quit" | "exit" | "esc" | "/quit" | "/exit" | "/q" => ReplInput::Quit,
            "/help" | "/h" | "/?" => ReplInput::Help,
            "/hints" => ReplInput::ShowHints,
            _ if line.starts_with('/') => ReplInput::Unknown(line),
            _ => ReplInput::Question(line),
        }
    }
}

/// Interactive prompt; hints carry over between questions
pub struct ChatRepl<O: ReasoningOracle + 'static> {
    runner: QueryRunner<O>,
}

impl<O: ReasoningOracle + 'static> ChatRepl<O> {
    pub fn new(runner: QueryRunner<O>) -> Self {
        Self { runner }
    }

    /// Run until the user quits. Returns `Err` for editor failures and for
    /// a question that ended in an invariant violation.
    pub async fn run(&mut self) -> Result<(), ReplError> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("mrce").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        let mut outcome = Ok(());
        loop {
            match rl.readline("?> ") {
                Ok(line) => match ReplInput::parse(&line) {
                    ReplInput::Quit => {
                        println!("Bye!");
                        break;
                    }
                    ReplInput::Help => Self::print_help(),
                    ReplInput::ShowHints => self.print_hints(),
                    ReplInput::Unknown(cmd) => {
                        println!("Unknown command: {}", cmd);
                        println!("Type /help for available commands");
                    }
                    ReplInput::Question(question) => {
                        let _ = rl.add_history_entry(question);
                        if let Err(e) = self.process_question(question).await {
                            outcome = Err(ReplError::Fatal(e));
                            break;
                        }
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        outcome
    }

    fn print_welcome(&self) {
        let settings = self.runner.settings();
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          mrce - Interactive Mode            │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Mode: {}  Goal: {}", settings.mode, settings.goal);
        println!(
            "Rounds: {}  Experts per round: {}",
            settings.params.max_rounds, settings.params.top_k
        );
        Self::print_help();
    }

    fn print_help() {
        println!();
        println!("Type a question and press Enter.");
        println!("Commands:");
        println!("  /help, /h, /?          - Show this help");
        println!("  /hints                 - Show hints carried to the next question");
        println!("  /quit, q, esc, (empty) - Exit");
        println!();
    }

    fn print_hints(&self) {
        match self.runner.hints() {
            Some(hints) if !hints.is_empty() => {
                println!();
                if !hints.router_guidance.is_empty() {
                    println!("router: {}", hints.router_guidance);
                }
                for (persona, hint) in &hints.expert_hints {
                    if !hint.is_empty() {
                        println!("{}: {}", persona, hint);
                    }
                }
                println!();
            }
            _ => println!("No hints yet."),
        }
    }

    async fn process_question(&mut self, question: &str) -> Result<(), SessionError> {
        println!();
        let result = keep_going_unless_fatal(self.runner.run(question).await);
        println!();
        result
    }
}

/// Report a failed question; only fatal errors stop the loop.
fn keep_going_unless_fatal(
    result: Result<DeliberationOutcome, SessionError>,
) -> Result<(), SessionError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.is_fatal() => {
            eprintln!("Error: {}", e);
            Err(e)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            Ok(())
        }
    }
}
