use std::fmt;
use std::io::{self, Write};

#[derive(Debug, Clone)]
pub struct UiError {
    message: String,
}

impl UiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UiError {}

pub fn prompt_token() -> Result<String, UiError> {
    println!("🔐 GenContentHub Authentication Setup");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    print!("Enter Replicate API token: ");
    io::stdout()
        .flush()
        .map_err(|err| UiError::new(err.to_string()))?;

    read_token(io::stdin().lock())
}

fn read_token(mut reader: impl io::BufRead) -> Result<String, UiError> {
    let mut input = String::new();
    reader
        .read_line(&mut input)
        .map_err(|err| UiError::new(err.to_string()))?;
    let token = input.trim().to_string();
    if token.is_empty() {
        return Err(UiError::new("Token cannot be empty"));
    }
    Ok(token)
}
