use crate::error::Result;
use crate::model::{CreateUrlRequest, CreateUrlResponse, GetUrlResponse};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use shortify_core::ShortCode;

pub async fn create_url_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let short_code = state.shortener().shorten(&request.long_url).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUrlResponse {
            short_url: state.short_url(&short_code),
            short_code,
            long_url: request.long_url,
        }),
    ))
}

/// Answers with a `301 Moved Permanently` to the long URL.
///
/// `/health` and `/shorten` take precedence over this route, so a minted
/// code spelling either one only resolves through `GET /v1/urls/{short_code}`.
pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let short_code = ShortCode::new(&short_code)?;
    let long_url = state.redirector().resolve(&short_code).await?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, long_url)]).into_response())
}

pub async fn get_url_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<GetUrlResponse>> {
    let short_code = ShortCode::new(&short_code)?;
    let long_url = state.redirector().resolve(&short_code).await?;

    Ok(Json(GetUrlResponse {
        short_code,
        long_url,
    }))
}
