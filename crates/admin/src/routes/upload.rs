//! Bulk upload and manual sentiment analysis route handlers.

use askama::Template;
use axum::{
    Form, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::filters;
use crate::middleware::{AdminContext, RequireAdminAuth, set_flash, take_flash};
use crate::models::{AnalysisRecord, ManualReview, UploadRecord, UploadedFile};
use crate::services::{ActionKind, ActionState, UploadError, perform, upload};
use crate::state::AppState;

use super::{PageChrome, cancelled_or, render, render_with_status, today};

/// Platforms offered by the manual entry form.
const MANUAL_PLATFORMS: [&str; 4] = ["Zomato", "Swiggy", "BlinkIT", "Others"];

/// Headroom over the accepted size so oversized files reach the size check
/// instead of failing mid-stream.
const BODY_LIMIT_BYTES: usize = 12 * 1024 * 1024;

/// Manual review entry form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub rating: Option<String>,
}

impl AnalyzeForm {
    /// Trimmed manual review; unparsable ratings count as no rating.
    fn to_manual_review(&self) -> ManualReview {
        ManualReview {
            customer: self.customer.trim().to_string(),
            text: self.text.trim().to_string(),
            platform: self.platform.trim().to_string(),
            rating: self
                .rating
                .as_deref()
                .and_then(|r| r.trim().parse::<u8>().ok())
                .map_or(0, |r| r.min(5)),
        }
    }
}

/// Upload page template.
#[derive(Template)]
#[template(path = "upload/index.html")]
pub struct UploadTemplate {
    pub chrome: PageChrome,
    pub staged: Option<UploadedFile>,
    pub history: Vec<UploadRecord>,
    /// Values echoed into the manual entry form.
    pub draft: ManualReview,
    pub last_analysis: Option<AnalysisRecord>,
    pub upload_error: Option<String>,
    pub analyze_error: Option<String>,
    pub processing: bool,
    pub analyzing: bool,
}

impl UploadTemplate {
    /// Snapshot the workspace into a page. Errors left by failed actions are
    /// shown unless the caller supplies fresher ones.
    fn from_context(ctx: &AdminContext, flash: Option<String>) -> Self {
        let workspace = ctx.workspace.lock();
        let failure = |kind| match workspace.actions.state(kind) {
            ActionState::Failed(reason) => Some(reason),
            ActionState::Idle | ActionState::Pending => None,
        };
        Self {
            chrome: PageChrome::new(&ctx.admin, "/upload", flash),
            staged: workspace.staged_upload.clone(),
            history: workspace.upload_history.clone(),
            draft: workspace
                .last_analysis
                .as_ref()
                .map(|a| a.input.clone())
                .unwrap_or_default(),
            last_analysis: workspace.last_analysis.clone(),
            upload_error: failure(ActionKind::ProcessUpload),
            analyze_error: failure(ActionKind::Analyze),
            processing: workspace.actions.is_pending(ActionKind::ProcessUpload),
            analyzing: workspace.actions.is_pending(ActionKind::Analyze),
        }
    }

    /// Platform select options with the draft's platform selected.
    #[must_use]
    pub fn platform_options(&self) -> Vec<PlatformOption> {
        MANUAL_PLATFORMS
            .into_iter()
            .map(|name| PlatformOption {
                name,
                selected: name == self.draft.platform,
            })
            .collect()
    }

    /// Star radio buttons for the manual entry form.
    #[must_use]
    pub fn rating_options(&self) -> Vec<RatingOption> {
        (1..=5)
            .map(|value| RatingOption {
                value,
                checked: value == self.draft.rating,
            })
            .collect()
    }
}

/// One entry of the manual entry platform select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformOption {
    pub name: &'static str,
    pub selected: bool,
}

/// One star radio button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingOption {
    pub value: u8,
    pub checked: bool,
}

/// Build the upload router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", get(upload_page))
        .route(
            "/upload/file",
            post(upload_file).layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES)),
        )
        .route("/upload/process", post(process_upload))
        .route("/upload/analyze", post(analyze))
}

/// Upload form, history and manual analysis.
///
/// GET /upload
#[instrument(skip_all)]
async fn upload_page(RequireAdminAuth(ctx): RequireAdminAuth, session: Session) -> Response {
    let flash = take_flash(&session).await;
    render(&UploadTemplate::from_context(&ctx, flash))
}

/// Metadata of the first `file` field, with the size counted from the
/// streamed body.
async fn read_file_field(
    multipart: &mut Multipart,
) -> Result<Option<(String, Option<String>, u64)>, AppError> {
    let bad_body =
        |e: axum::extract::multipart::MultipartError| AppError::BadRequest(e.body_text());

    while let Some(mut field) = multipart.next_field().await.map_err(bad_body)? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let mut size: u64 = 0;
        while let Some(chunk) = field.chunk().await.map_err(bad_body)? {
            size = size.saturating_add(u64::try_from(chunk.len()).unwrap_or(u64::MAX));
        }
        return Ok(Some((name, content_type, size)));
    }
    Ok(None)
}

/// Stage a CSV or Excel file.
///
/// POST /upload/file
#[instrument(skip_all)]
async fn upload_file(
    RequireAdminAuth(ctx): RequireAdminAuth,
    session: Session,
    mut multipart: Multipart,
) -> Response {
    let accepted = match read_file_field(&mut multipart).await {
        Ok(Some((name, content_type, size))) => {
            upload::accept(&name, content_type.as_deref(), size).map_err(AppError::from)
        }
        Ok(None) => Err(AppError::from(UploadError::MissingFile)),
        Err(e) => Err(e),
    };

    match accepted {
        Ok(file) => {
            let message = format!("{} ({} KB) is ready to process.", file.name, file.size_kb());
            tracing::info!(file = %file.name, size_bytes = file.size_bytes, "File staged");
            ctx.workspace.lock().stage_upload(file);
            if let Err(e) = set_flash(&session, &message).await {
                return AppError::from(e).into_response();
            }
            Redirect::to("/upload").into_response()
        }
        Err(e) => {
            let mut page = UploadTemplate::from_context(&ctx, None);
            page.upload_error = Some(e.user_message());
            render_with_status(e.status(), &page)
        }
    }
}

/// Process the staged file.
///
/// POST /upload/process
#[instrument(skip_all)]
async fn process_upload(
    State(state): State<AppState>,
    RequireAdminAuth(ctx): RequireAdminAuth,
    session: Session,
) -> Response {
    let delay = state.config().latency.process_upload;
    let date = today();
    let processed = async {
        // Fails fast without the delay. `record_upload` checks again under
        // the lock that applies the result.
        if ctx.workspace.lock().staged_upload.is_none() {
            return Err(AppError::from(crate::store::StoreError::NoStagedUpload));
        }
        perform(
            &ctx.workspace,
            ActionKind::ProcessUpload,
            delay,
            async { Ok(()) },
            |ws, ()| ws.record_upload(date).map_err(AppError::from),
        )
        .await
    };

    match processed.await {
        Ok(file) => {
            tracing::info!(%file, "Upload processing started");
            let message = format!("{file} uploaded. Reviews are being processed.");
            if let Err(e) = set_flash(&session, &message).await {
                return AppError::from(e).into_response();
            }
            Redirect::to("/upload").into_response()
        }
        Err(e) => cancelled_or(e, |e| {
            let mut page = UploadTemplate::from_context(&ctx, None);
            page.upload_error = Some(e.user_message());
            render_with_status(e.status(), &page)
        }),
    }
}

/// Classify a manually entered review.
///
/// POST /upload/analyze
#[instrument(skip_all)]
async fn analyze(
    State(state): State<AppState>,
    RequireAdminAuth(ctx): RequireAdminAuth,
    Form(form): Form<AnalyzeForm>,
) -> Response {
    let input = form.to_manual_review();
    let failed = |ctx: &AdminContext, input: ManualReview, err: &AppError| {
        let mut page = UploadTemplate::from_context(ctx, None);
        page.draft = input;
        page.analyze_error = Some(err.user_message());
        render_with_status(err.status(), &page)
    };

    if input.text.is_empty() {
        let err = AppError::Validation("Please enter review text to analyze.".to_string());
        return failed(&ctx, input, &err);
    }

    let classifier = state.classifier();
    let text = input.text.clone();
    let record_input = input.clone();
    let analyzed = perform(
        &ctx.workspace,
        ActionKind::Analyze,
        state.config().latency.analyze,
        async move { classifier.classify(&text).await.map_err(AppError::from) },
        |ws, result| {
            let sentiment = result.sentiment;
            ws.set_analysis(AnalysisRecord {
                input: record_input,
                result,
            });
            Ok(sentiment)
        },
    )
    .await;

    match analyzed {
        Ok(sentiment) => {
            tracing::info!(classifier = classifier.name(), %sentiment, "Review analyzed");
            Redirect::to("/upload#analysis").into_response()
        }
        Err(e) => cancelled_or(e, |e| failed(&ctx, input, &e)),
    }
}
