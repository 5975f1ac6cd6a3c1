//! Interactive chat loop

use anyhow::Result;
use colored::Colorize;
use parley_application::{ConverseInput, ConverseUseCase};
use std::io::{BufRead, Write};

/// Run the interactive loop: read a line, respond, repeat.
///
/// Degraded replies render exactly like normal ones; the conversation
/// endpoint never "fails" from the user's point of view.
pub async fn run(converse: &ConverseUseCase, user_id: &str, session_id: &str) -> Result<()> {
    println!("{}", "parley chat".bold());
    println!("{}", "Type /clear to reset the session, /quit to exit.".dimmed());

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("{} ", ">>>".cyan());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }
        let message = line.trim();

        match message {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                if converse.clear_session(session_id).await {
                    println!("{}", "Session history cleared.".dimmed());
                } else {
                    println!("{}", "No active session to clear.".dimmed());
                }
                continue;
            }
            _ => {}
        }

        let reply = converse
            .respond(ConverseInput::new(user_id, session_id, message))
            .await;
        println!("{}", reply.green());
        println!();
    }

    println!("{}", "Bye.".dimmed());
    Ok(())
}
