//! Form page handlers

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};

use crate::features::{extract_features, first_wins};
use crate::flash::{clear_cookie, decode_flash, encode_flash, read_flash_cookie, set_cookie};
use crate::views::render_index;
use crate::{AppError, AppResult, AppState};

/// GET / - empty form, plus any pending flash
pub async fn show(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let Some(token) = read_flash_cookie(&headers) else {
        return Ok(Html(render_index(None, None, None)).into_response());
    };

    let message = decode_flash(&state.config.secret_key, token);
    let page = Html(render_index(None, None, message.as_deref()));
    let cookie = HeaderValue::from_str(&clear_cookie(state.config.is_production()))?;

    Ok(([(SET_COOKIE, cookie)], page).into_response())
}

/// POST / - classify the submitted account
///
/// A body that is not urlencoded carries no form fields, so every field takes
/// its default.
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> AppResult<Response> {
    let pairs = match form {
        Ok(Form(pairs)) => pairs,
        Err(FormRejection::InvalidFormContentType(e)) => {
            tracing::debug!("{} - using defaults", e);
            Vec::new()
        }
        Err(e) => return Err(AppError::ValidationError(e.body_text())),
    };
    let form = first_wins(pairs);

    let features = match extract_features(&form) {
        Ok(features) => features,
        Err(e) => {
            tracing::info!("Rejected submission: {}", e);

            let token = encode_flash(
                &state.config.secret_key,
                &format!("Error parsing input: {}", e),
            )?;
            let cookie = HeaderValue::from_str(&set_cookie(&token, state.config.is_production()))?;

            return Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response());
        }
    };

    let result = state.classifier.classify(&features);

    tracing::debug!(features = %features.to_log_entry(), "Scoring submission");
    tracing::info!(
        label = %result.label,
        method = ?result.method,
        confidence = ?result.confidence,
        "Account classified"
    );

    Ok(Html(render_index(Some(&features), Some(&result), None)).into_response())
}
