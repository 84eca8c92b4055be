use std::io::Write;
use std::sync::Mutex;

use anyhow::{Context, Result};
use colored::Colorize;
use medview_core::{OrdsClient, ViewState, Viewer};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::output::{print_success, render};

const PROMPT: &str = "patient id> ";

/// What one line of input asks for.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Fetch(&'a str),
    Clear,
    Help,
    Quit,
    Nothing,
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        "" => Input::Nothing,
        "clear" => Input::Clear,
        "help" | "?" => Input::Help,
        "quit" | "exit" => Input::Quit,
        id => Input::Fetch(id),
    }
}

pub async fn shell(viewer: &Viewer<OrdsClient>) -> Result<()> {
    println!(
        "{} {}",
        "Patient Profile Viewer".cyan().bold(),
        format!("({})", viewer.source().config().endpoint()).dimmed()
    );
    println!("Type a patient ID to fetch it, `clear` to clear, `quit` to leave.");

    let state = Mutex::new(ViewState::new());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{PROMPT}");
        std::io::stdout().flush().context("Failed to write prompt")?;

        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            println!();
            break;
        };

        match parse_input(&line) {
            Input::Nothing => {}
            Input::Help => {
                println!("  <id>    fetch a patient profile");
                println!("  clear   clear the display");
                println!("  quit    leave");
            }
            Input::Quit => break,
            Input::Clear => {
                state
                    .lock()
                    .unwrap_or_else(std::sync::PoisonError::into_inner)
                    .clear();
                print_success("Cleared");
            }
            Input::Fetch(id) => {
                viewer.fetch_into(&state, id).await;
                let state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
                println!("{}", render(&state));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("  "), Input::Nothing);
        assert_eq!(parse_input("clear\n"), Input::Clear);
        assert_eq!(parse_input("?"), Input::Help);
        assert_eq!(parse_input("exit"), Input::Quit);
        assert_eq!(parse_input(" 42 "), Input::Fetch("42"));
    }
}
