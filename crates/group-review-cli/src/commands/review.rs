use super::prompts;
use crate::output::{Output, OutputFormat};
use crate::{ReviewCommands, ReviewFields};
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use group_review_client::{HttpReviewClient, ReviewApi};
use group_review_config::{Config, CredentialStore, PathManager};
use group_review_core::{FormMode, FormView, ReviewForm, SubmitOutcome};
use group_review_models::{ExistingReview, ReviewTarget, SessionIdentity, UserId};
use serde_json::json;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub async fn run_review(cmd: ReviewCommands, config: &Config, path_manager: &PathManager, output: &Output) -> Result<()> {
    let (target, existing, fields) = match cmd {
        ReviewCommands::Add { group, media, fields } => (ReviewTarget::new(group, media), None, fields),
        ReviewCommands::Edit {
            group,
            media,
            review_file,
            fields,
        } => {
            let existing = load_existing_review(&review_file)?;
            (ReviewTarget::new(group, media), Some(existing), fields)
        }
    };

    config
        .validate()
        .map_err(|e| eyre!("Configuration is invalid: {}", e))?;

    let session = load_session(path_manager)?;
    if !session.has_token() {
        output.warn("No session token stored; the server will likely refuse the request. Run 'groupreview session set'.");
    }

    let client = HttpReviewClient::new(
        &config.api.base_url,
        session.token.clone(),
        Duration::from_secs(config.api.timeout_seconds),
    )
    .map_err(|e| eyre!("Failed to create API client: {}", e))?;
    tracing::debug!(base_url = client.base_url(), user_id = session.user_id, "Review client ready");

    let interactive = !fields.yes && std::io::stdin().is_terminal();
    review_with_api(Arc::new(client), target, existing, session.user_id, fields, interactive, output).await
}

/// Build the form for `user_id`, drive it, and report what happened.
async fn review_with_api(
    api: Arc<dyn ReviewApi>,
    target: ReviewTarget,
    existing: Option<ExistingReview>,
    user_id: UserId,
    fields: ReviewFields,
    interactive: bool,
    output: &Output,
) -> Result<()> {
    let submitted = Arc::new(AtomicBool::new(false));
    let cancelled = Arc::new(AtomicBool::new(false));
    let mut form = {
        let submitted = submitted.clone();
        let cancelled = cancelled.clone();
        ReviewForm::new(api, target, user_id)
            .with_on_submitted(move || submitted.store(true, Ordering::SeqCst))
            .with_on_cancel(move || cancelled.store(true, Ordering::SeqCst))
    };
    if let Some(review) = existing {
        form.set_existing_review(review);
    }

    if form.render().is_hidden() {
        output.warn("This review belongs to another user; there is nothing for you to edit.");
        return Ok(());
    }

    run_form(&mut form, fields, interactive, output).await?;

    if cancelled.load(Ordering::SeqCst) {
        output.info("Cancelled, nothing was sent.");
    } else if submitted.load(Ordering::SeqCst) {
        report_success(&form, output);
    }
    Ok(())
}

/// Fill in, confirm and submit the form until it succeeds, is cancelled or fails for good.
async fn run_form(form: &mut ReviewForm, fields: ReviewFields, interactive: bool, output: &Output) -> Result<()> {
    let mut pending_fields = Some(fields);

    loop {
        let fields = pending_fields.take().unwrap_or_default();
        fill_fields(form, &fields, interactive, output)?;

        if let FormView::Visible(snapshot) = form.render() {
            output.form_preview(&snapshot);
            if interactive && !prompts::prompt_yes_no(&format!("{}?", snapshot.submit_label), true)? {
                form.cancel();
                return Ok(());
            }
        }

        let outcome = form.submit().await;
        if outcome.is_success() {
            return Ok(());
        }
        match outcome {
            SubmitOutcome::Rejected(error) => {
                let message = error.to_string();
                if interactive && error.is_recoverable() {
                    output.error(&message);
                    if prompts::prompt_yes_no("Edit and try again?", true)? {
                        continue;
                    }
                    return Err(eyre!("Review was not submitted"));
                }
                return Err(eyre!(message));
            }
            _ => return Err(eyre!("A review request is already in flight")),
        }
    }
}

fn fill_fields(form: &mut ReviewForm, fields: &ReviewFields, interactive: bool, output: &Output) -> Result<()> {
    match &fields.text {
        Some(text) => form.set_text(text.as_str()),
        None if interactive => {
            let text = prompts::prompt_string("Your review", Some(&form.draft().text))?;
            form.set_text(text);
        }
        None if form.draft().has_text() => {}
        None => return Err(eyre!("--text is required when not running interactively")),
    }

    match &fields.rating {
        Some(rating) => {
            if !form.set_rating_input(rating) {
                return Err(eyre!("--rating must be a number, got '{}'", rating));
            }
        }
        None if interactive => {
            let rating = prompts::prompt_rating(form.draft().rating, output)?;
            form.set_rating(rating);
        }
        None => {}
    }

    Ok(())
}

fn report_success(form: &ReviewForm, output: &Output) {
    let target = form.target();
    let review_id = match form.mode() {
        FormMode::Create => None,
        FormMode::Edit { review_id } => Some(review_id),
    };
    match output.format() {
        OutputFormat::Human => match review_id {
            None => output.success(format!(
                "Review added for media {} in group {}",
                target.media_id, target.group_id
            )),
            Some(review_id) => output.success(format!("Review #{} updated", review_id)),
        },
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "success": true,
                "action": if review_id.is_some() { "updated" } else { "created" },
                "group_id": target.group_id,
                "media_id": target.media_id,
                "review_id": review_id,
            }));
        }
    }
}

fn load_existing_review(path: &Path) -> Result<ExistingReview> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read review file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse review file {}", path.display()))
}

/// The signed-in session; the user id always comes from the stored session.
fn load_session(path_manager: &PathManager) -> Result<SessionIdentity> {
    let credentials_file = path_manager.credentials_file();
    let mut store = CredentialStore::new(credentials_file.clone());
    store
        .load()
        .map_err(|e| eyre!("Failed to load session from {}: {}", credentials_file.display(), e))?;

    store
        .session()
        .ok_or_else(|| eyre!("No user id known. Run 'groupreview session set' first"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use group_review_client::RequestFailure;
    use group_review_models::{GroupId, MediaId, ReviewId, ReviewPayload};
    use std::io::Write;
    use std::sync::Mutex;

    /// Records every request and answers each with the same result.
    struct ScriptedApi {
        calls: Mutex<Vec<String>>,
        response: Result<(), RequestFailure>,
    }

    impl ScriptedApi {
        fn new(response: Result<(), RequestFailure>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                response,
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ReviewApi for ScriptedApi {
        async fn create_review(
            &self,
            group_id: GroupId,
            media_id: MediaId,
            payload: &ReviewPayload,
        ) -> Result<(), RequestFailure> {
            self.calls.lock().unwrap().push(format!(
                "create {}/{} {:?} {}",
                group_id, media_id, payload.text, payload.rating
            ));
            self.response.clone()
        }

        async fn update_review(
            &self,
            group_id: GroupId,
            review_id: ReviewId,
            payload: &ReviewPayload,
        ) -> Result<(), RequestFailure> {
            self.calls.lock().unwrap().push(format!(
                "update {}/{} {:?} {}",
                group_id, review_id, payload.text, payload.rating
            ));
            self.response.clone()
        }
    }

    fn quiet() -> Output {
        Output::new(OutputFormat::Human, true)
    }

    fn fields(text: Option<&str>, rating: Option<&str>) -> ReviewFields {
        ReviewFields {
            text: text.map(str::to_string),
            rating: rating.map(str::to_string),
            yes: true,
        }
    }

    fn form_for(api: &Arc<ScriptedApi>) -> ReviewForm {
        ReviewForm::new(api.clone(), ReviewTarget::new(3, 17), 42)
    }

    #[tokio::test]
    async fn test_run_form_creates_and_clears_draft() {
        let api = ScriptedApi::new(Ok(()));
        let mut form = form_for(&api);

        run_form(&mut form, fields(Some("Loved it"), Some("8.5")), false, &quiet())
            .await
            .unwrap();

        assert_eq!(api.calls(), vec![r#"create 3/17 "Loved it" 9"#.to_string()]);
        assert_eq!(form.draft().text, "");
        assert_eq!(form.draft().rating, 0);
    }

    #[tokio::test]
    async fn test_run_form_surfaces_server_detail() {
        let api = ScriptedApi::new(Err(RequestFailure::Http {
            status: 400,
            detail: Some("You already reviewed this".to_string()),
        }));
        let mut form = form_for(&api);

        let err = run_form(&mut form, fields(Some("Again"), Some("4")), false, &quiet())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("You already reviewed this"), "error was {}", err);
        assert_eq!(api.calls().len(), 1);
        assert_eq!(form.draft().text, "Again");
    }

    #[tokio::test]
    async fn test_run_form_requires_text_without_terminal() {
        let api = ScriptedApi::new(Ok(()));
        let mut form = form_for(&api);

        let err = run_form(&mut form, fields(None, Some("5")), false, &quiet())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("--text"), "error was {}", err);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_run_form_rejects_unparseable_rating() {
        let api = ScriptedApi::new(Ok(()));
        let mut form = form_for(&api);

        let err = run_form(&mut form, fields(Some("Fine"), Some("ten")), false, &quiet())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("--rating"), "error was {}", err);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_run_form_reports_validation_message() {
        let api = ScriptedApi::new(Ok(()));
        let mut form = form_for(&api);

        let err = run_form(&mut form, fields(Some("Too generous"), Some("11")), false, &quiet())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Please enter a valid review and a rating between 0 and 10"
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_edit_keeps_existing_text_when_none_given() {
        let api = ScriptedApi::new(Ok(()));
        let existing = ExistingReview {
            id: 5,
            text: "Tense finale".to_string(),
            rating: 9,
            author_user_id: 42,
        };

        review_with_api(
            api.clone(),
            ReviewTarget::new(3, 17),
            Some(existing),
            42,
            fields(None, Some("7")),
            false,
            &quiet(),
        )
        .await
        .unwrap();

        assert_eq!(api.calls(), vec![r#"update 3/5 "Tense finale" 7"#.to_string()]);
    }

    #[tokio::test]
    async fn test_foreign_review_exits_without_request() {
        let api = ScriptedApi::new(Ok(()));
        let existing = ExistingReview {
            id: 5,
            text: "Not mine".to_string(),
            rating: 3,
            author_user_id: 7,
        };

        review_with_api(
            api.clone(),
            ReviewTarget::new(3, 17),
            Some(existing),
            42,
            fields(Some("Overwritten"), Some("10")),
            false,
            &quiet(),
        )
        .await
        .unwrap();

        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_load_existing_review() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"id": 5, "text": "Tense finale", "rating": 9, "user_id": 42}}"#).unwrap();

        let review = load_existing_review(file.path()).unwrap();
        assert_eq!(review.id, 5);
        assert_eq!(review.author_user_id, 42);
    }

    #[test]
    fn test_load_existing_review_rejects_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load_existing_review(file.path()).is_err());
    }

    #[test]
    fn test_load_session_reads_stored_identity() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path().to_path_buf());
        let mut store = CredentialStore::new(paths.credentials_file());
        store.set_token("tok".to_string());
        store.set_user_id(1);
        store.save().unwrap();

        let session = load_session(&paths).unwrap();
        assert_eq!(session.user_id, 1);
        assert_eq!(session.token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_load_session_requires_user_id() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::with_base(dir.path().to_path_buf());
        assert!(load_session(&paths).is_err());
    }
}
