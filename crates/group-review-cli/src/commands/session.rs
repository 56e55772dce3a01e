use super::prompts;
use crate::output::{Output, OutputFormat};
use crate::SessionCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use group_review_config::{CredentialStore, PathManager};
use serde_json::json;

pub fn run_session(cmd: SessionCommands, path_manager: &PathManager, output: &Output) -> Result<()> {
    let credentials_file = path_manager.credentials_file();
    let mut store = CredentialStore::new(credentials_file.clone());
    store
        .load()
        .map_err(|e| eyre!("Failed to load session from {}: {}", credentials_file.display(), e))?;

    match cmd {
        SessionCommands::Set { token, user_id } => {
            let token = match token {
                Some(token) => token,
                None => prompts::prompt_password("Bearer token")?,
            };
            let token = token.trim().to_string();
            if token.is_empty() {
                return Err(eyre!("Token cannot be empty"));
            }
            let user_id = match user_id {
                Some(user_id) => user_id,
                None => prompts::prompt_number("Your user id", output)?,
            };

            store.set_token(token);
            store.set_user_id(user_id);
            store
                .save()
                .map_err(|e| eyre!("Failed to save session to {}: {}", credentials_file.display(), e))?;
            tracing::info!(user_id, "Session stored");
            output.success(format!("Session saved for user {}", user_id));
        }
        SessionCommands::Show { full } => {
            let token = store.get_token().map(|t| if full { t.clone() } else { mask_token(t) });
            let saved_at = store.get_token_saved_at().map(|t| t.to_rfc3339());
            match output.format() {
                OutputFormat::Human => {
                    let user = store
                        .get_user_id()
                        .map_or_else(|| "<not set>".to_string(), |id| id.to_string());
                    output.info(format!("User id:  {}", user));
                    output.info(format!("Token:    {}", token.as_deref().unwrap_or("<not set>")));
                    if let Some(saved_at) = &saved_at {
                        output.info(format!("Saved at: {}", saved_at));
                    }
                }
                OutputFormat::Json | OutputFormat::JsonPretty => {
                    output.json(&json!({
                        "user_id": store.get_user_id(),
                        "token": token,
                        "token_saved_at": saved_at,
                    }));
                }
            }
        }
        SessionCommands::Clear => {
            store.clear_session();
            store
                .save()
                .map_err(|e| eyre!("Failed to save session to {}: {}", credentials_file.display(), e))?;
            output.success("Session cleared");
        }
    }

    Ok(())
}

fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}***{}", head, tail)
}
