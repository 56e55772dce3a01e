use clap::ValueEnum;
use group_review_core::{FormMode, FormSnapshot};
use owo_colors::OwoColorize;
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        self.message("success", "✓".green().to_string(), msg.as_ref());
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "error", "message": msg.as_ref() }));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": "info", "message": msg.as_ref() }));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        self.message("warning", "⚠".yellow().to_string(), msg.as_ref());
    }

    /// Show the form as it will be submitted.
    pub fn form_preview(&self, snapshot: &FormSnapshot) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => {
                let heading = match snapshot.mode {
                    FormMode::Create => "New review".to_string(),
                    FormMode::Edit { review_id } => format!("Editing review #{}", review_id),
                };
                println!("{}", heading.bold().bright_cyan());
                println!("  {}: {}", snapshot.rating_label, snapshot.rating);
                for line in snapshot.text.lines() {
                    println!("  │ {}", line);
                }
                if let Some(error) = &snapshot.error {
                    println!("  {}", error.red());
                }
            }
            OutputFormat::Json | OutputFormat::JsonPretty => {
                let review_id = match snapshot.mode {
                    FormMode::Create => None,
                    FormMode::Edit { review_id } => Some(review_id),
                };
                self.print_json(&json!({
                    "type": "preview",
                    "review_id": review_id,
                    "text": snapshot.text,
                    "rating": snapshot.rating,
                    "error": snapshot.error,
                }));
            }
        }
    }

    pub fn json(&self, data: &serde_json::Value) {
        if self.quiet && self.format != OutputFormat::Human {
            return;
        }
        self.print_json(data);
    }

    fn message(&self, kind: &str, marker: String, msg: &str) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", marker, msg),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({ "type": kind, "message": msg }));
            }
        }
    }

    fn print_json(&self, data: &serde_json::Value) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(data).unwrap_or_default()),
            OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(data).unwrap_or_default()),
            OutputFormat::Human => println!("{}", data),
        }
    }
}
