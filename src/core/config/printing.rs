use crate::core::config::data::{path_display, Config, DEFAULT_API_BASE_URL};
use crate::core::feedback::DEFAULT_FEEDBACK_FILE;

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.tone {
            Some(tone) => println!("  tone: {tone}"),
            None => println!("  tone: (unset, Friendly)"),
        }
        match self.slogan_count {
            Some(count) => println!("  slogans: {count}"),
            None => println!("  slogans: (unset, 1)"),
        }
        match &self.model {
            Some(model) => println!("  model: {model}"),
            None => println!("  model: (unset, Llama2-7B)"),
        }
        match &self.creativity {
            Some(level) => println!("  creativity: {level}"),
            None => println!("  creativity: (unset, Precise)"),
        }
        match &self.feedback_file {
            Some(path) => println!("  feedback-file: {}", path_display(path)),
            None => println!("  feedback-file: (unset, {DEFAULT_FEEDBACK_FILE})"),
        }
        match &self.api_base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset, {DEFAULT_API_BASE_URL})"),
        }
    }
}
