//! Download delivery endpoints
//!
//! Each claim decodes the visitor's quota cookie, asks the tracker for an
//! admission decision, starts delivery, and only then records the download
//! and hands the new token back in `Set-Cookie`. A delivery that fails to
//! start is never charged.

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use quota_rs::{AdmissionResult, DenialReason, DownloadRequest, QuotaState, QuotaStatus};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tracing::{info, warn};

use crate::bundle::build_bundle;
use crate::catalog::file_stem;
use crate::config::ArtworkConfig;
use crate::cookie::{read_token, set_cookie};
use crate::error::{ClaimError, Result};
use crate::server::ClaimState;

/// Query string of `GET /api/claim-art`
#[derive(Debug, Deserialize)]
pub struct ClaimQuery {
    #[serde(rename = "artId")]
    pub art_id: Option<String>,
    #[serde(rename = "sizeId")]
    pub size_id: Option<String>,
    /// `all` requests the all-sizes ZIP
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ClaimQuery {
    fn is_bundle(&self) -> bool {
        self.kind.as_deref() == Some("all")
    }
}

/// Body of a 403 denial
#[derive(Debug, Serialize)]
pub struct DenialResponse {
    pub error: String,
    pub reason: DenialReason,
    pub remaining: usize,
    pub limit: usize,
    pub reset_at: Option<DateTime<Utc>>,
}

/// A file ready to stream
struct Delivery {
    body: Body,
    content_type: &'static str,
    content_length: u64,
    file_name: String,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /api/claim-art - Download one size, or all sizes with `type=all`
pub async fn claim_art(
    State(state): State<Arc<ClaimState>>,
    Query(query): Query<ClaimQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let is_bundle = query.is_bundle();
    let art_id = non_empty(query.art_id).ok_or(ClaimError::MissingParameter("artId"))?;

    let artwork = state.catalog.artwork(&art_id)?;

    let (request, asset) = if is_bundle {
        (DownloadRequest::bundle(&art_id), None)
    } else {
        let size_id = non_empty(query.size_id).ok_or(ClaimError::MissingParameter("sizeId"))?;
        let path = state.catalog.resolve_variant(&art_id, &size_id)?;
        (DownloadRequest::variant(&art_id, size_id), Some(path))
    };

    let now = state.clock.now();
    let quota = QuotaState::decode(read_token(&headers, &state.cookie_name).as_deref());

    if state.bypass_quota {
        info!("Quota bypass enabled, skipping admission for {}", art_id);
    } else if let AdmissionResult::Denied { reason, message } = quota.check_admission(now, &request) {
        warn!("Download denied for {}/{}: {}", art_id, request.variant_id, reason.code());
        let status = quota.status_summary(now);
        return Ok(denial_response(reason, message, status));
    }

    let delivery = match asset {
        Some(path) => deliver_variant(artwork, &path, &request.variant_id).await?,
        None => deliver_bundle(&state, artwork).await?,
    };

    let updated = quota.record_download(now, &request);
    info!(
        "Download granted: {}/{} ({} remaining)",
        art_id,
        request.variant_id,
        updated.remaining(now)
    );

    let cookie = set_cookie(&state.cookie_name, &updated.encode(), state.secure_cookie);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, delivery.content_type.to_string()),
            (header::CONTENT_LENGTH, delivery.content_length.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", delivery.file_name),
            ),
            (header::CACHE_CONTROL, "no-cache".to_string()),
            (header::SET_COOKIE, cookie),
        ],
        delivery.body,
    )
        .into_response())
}

/// GET /api/downloads/status - Current quota for the caller's cookie
pub async fn quota_status(
    State(state): State<Arc<ClaimState>>,
    headers: HeaderMap,
) -> Json<QuotaStatus> {
    let quota = QuotaState::decode(read_token(&headers, &state.cookie_name).as_deref());
    Json(quota.status_summary(state.clock.now()))
}

fn denial_response(reason: DenialReason, message: String, status: QuotaStatus) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(DenialResponse {
            error: message,
            reason,
            remaining: status.remaining,
            limit: status.limit,
            reset_at: status.reset_at,
        }),
    )
        .into_response()
}

async fn deliver_variant(artwork: &ArtworkConfig, path: &Path, size_id: &str) -> Result<Delivery> {
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        warn!("Asset not readable {}: {}", path.display(), e);
        ClaimError::AssetMissing(path.display().to_string())
    })?;
    let content_length = file.metadata().await?.len();

    Ok(Delivery {
        body: Body::from_stream(ReaderStream::new(file)),
        content_type: "image/png",
        content_length,
        file_name: format!("{}-{}.png", file_stem(&artwork.title), size_id),
    })
}

async fn deliver_bundle(state: &ClaimState, artwork: &ArtworkConfig) -> Result<Delivery> {
    let assets = state.catalog.bundle_assets(artwork);

    if let Some((_, missing)) = assets.iter().find(|(_, path)| !path.is_file()) {
        warn!("Bundle asset missing: {}", missing.display());
        return Err(ClaimError::AssetMissing(missing.display().to_string()));
    }

    let title = artwork.title.clone();
    let bytes = tokio::task::spawn_blocking(move || build_bundle(&title, &assets))
        .await
        .map_err(|e| ClaimError::Io(std::io::Error::other(e)))??;

    Ok(Delivery {
        content_length: bytes.len() as u64,
        body: Body::from(bytes),
        content_type: "application/zip",
        file_name: format!("{}-all-sizes.zip", file_stem(&artwork.title)),
    })
}
