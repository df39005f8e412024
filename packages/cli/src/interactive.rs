//! Interactive question/answer loop using `dialoguer`.

use dialoguer::Input;
use pothole_assistant_resolver::QueryResolver;

use crate::transcript::Transcript;

/// What the loop should do with a line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    History,
    Ask(&'a str),
}

fn parse_line(line: &str) -> Command<'_> {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "" | "exit" | "quit" => Command::Quit,
        "history" => Command::History,
        _ => Command::Ask(trimmed),
    }
}

/// Prompts for questions until an empty line or `exit`.
///
/// `history` prints the questions and answers from this session.
///
/// # Errors
///
/// Returns an error if reading from the terminal fails.
pub async fn run(resolver: &QueryResolver) -> Result<(), Box<dyn std::error::Error>> {
    println!("San Antonio Pothole Assistant");
    println!("Ask about potholes, streets, or road conditions. Press Enter or type 'exit' to quit.");
    println!();

    let mut transcript = Transcript::default();

    loop {
        let line: String = Input::new()
            .with_prompt("You")
            .allow_empty(true)
            .interact_text()?;

        match parse_line(&line) {
            Command::Quit => break,
            Command::History => println!("{}", transcript.render()),
            Command::Ask(question) => {
                let answer = resolver.handle_query(question).await;
                println!("\n{answer}\n");
                transcript.record(question, answer);
            }
        }
    }

    log::debug!("Session ended after {} questions", transcript.len());
    Ok(())
}
