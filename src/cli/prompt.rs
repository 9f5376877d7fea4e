//! Interactive questions on the terminal.

use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use secrecy::SecretString;

/// Asks the user for input.
pub trait Prompt {
    /// Asks for one line of visible text, without the trailing newline.
    fn line(&mut self, question: &str) -> io::Result<String>;

    /// Asks for text that must not be echoed.
    fn secret(&mut self, question: &str) -> io::Result<SecretString>;

    /// Asks a yes/no question. Anything but `y` or `yes` is a no.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.line(&format!("{question} [y/N] "))?;
        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}

/// Prompts on stderr and reads from stdin.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn line(&mut self, question: &str) -> io::Result<String> {
        let mut stderr = io::stderr();
        write!(stderr, "{question}")?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim_end_matches(['\r', '\n']).to_string())
    }

    fn secret(&mut self, question: &str) -> io::Result<SecretString> {
        let mut stderr = io::stderr();
        write!(stderr, "{question}")?;
        stderr.flush()?;

        let input = {
            let _raw = RawMode::enable()?;
            read_hidden()?
        };
        writeln!(stderr)?;
        Ok(SecretString::from(input))
    }
}

/// Raw mode for the lifetime of the value.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn read_hidden() -> io::Result<String> {
    let mut input = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled"));
            }
            KeyCode::Esc => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled"));
            }
            KeyCode::Enter => return Ok(input),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedPrompt;
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn confirm_accepts_only_yes() {
        let mut prompt = ScriptedPrompt::new(["y", "YES", "", "n", "sure"]);
        let answers: Vec<bool> = (0..5).map(|_| prompt.confirm("Go?").unwrap()).collect();
        assert_eq!(answers, vec![true, true, false, false, false]);
        assert_eq!(prompt.asked[0], "Go? [y/N] ");
    }

    #[test]
    fn scripted_secret_is_wrapped() {
        let mut prompt = ScriptedPrompt::new(["hunter2"]);
        let secret = prompt.secret("Password: ").unwrap();
        assert_eq!(secret.expose_secret(), "hunter2");
        assert!(prompt.line("again").is_err());
    }
}
