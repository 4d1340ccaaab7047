use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{error, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::services::{current_user, AuthUser},
    error::ApiError,
    pdf::DocumentMeta,
    petitions::{
        dto::{GeneratePetitionRequest, Pagination, PetitionResponse, UpdateStatusRequest},
        repo::Petition,
        services::generate_petition,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/petitions/list", get(list_petitions))
        .route("/petitions/:id", get(get_petition))
        .route("/petitions/:id/pdf", get(get_petition_pdf))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/petitions/generate", post(generate))
        .route("/petitions/:id/status", patch(update_status))
}

/// Load a petition and enforce ownership. Mismatch is an authorization
/// failure distinct from not-found.
async fn owned_petition(
    state: &AppState,
    petition_id: Uuid,
    user_id: Uuid,
) -> Result<Petition, ApiError> {
    let petition = Petition::find_by_id(&state.db, petition_id)
        .await
        .map_err(|e| {
            error!(error = %e, %petition_id, "find_by_id failed");
            ApiError::Database
        })?
        .ok_or(ApiError::NotFound("Petition"))?;

    if petition.user_id != user_id {
        warn!(%user_id, %petition_id, "unauthorized petition access attempt");
        return Err(ApiError::Authorization);
    }
    Ok(petition)
}

#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<GeneratePetitionRequest>,
) -> Result<(StatusCode, Json<PetitionResponse>), ApiError> {
    let user = current_user(&state, user_id).await?;
    let petition = generate_petition(&state, &user, &payload).await?;
    Ok((StatusCode::CREATED, Json(petition.into())))
}

#[instrument(skip(state))]
pub async fn list_petitions(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<Vec<PetitionResponse>>, ApiError> {
    let user = current_user(&state, user_id).await?;
    let petitions = Petition::list_by_user(&state.db, user.id, p.offset(), p.page_size())
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "failed to list petitions");
            ApiError::Database
        })?;
    Ok(Json(petitions.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_petition(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PetitionResponse>, ApiError> {
    let user = current_user(&state, user_id).await?;
    let petition = owned_petition(&state, id, user.id).await?;
    Ok(Json(petition.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_status(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<PetitionResponse>, ApiError> {
    let user = current_user(&state, user_id).await?;
    let petition = owned_petition(&state, id, user.id).await?;

    let petition = Petition::update_status(&state.db, petition.id, payload.status)
        .await
        .map_err(|e| {
            error!(error = %e, petition_id = %id, "status update failed");
            ApiError::Database
        })?;
    Ok(Json(petition.into()))
}

/// Render the petition to PDF and return it as a downloadable artifact
/// named by the petition's identifier.
#[instrument(skip(state))]
pub async fn get_petition_pdf(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let user = current_user(&state, user_id).await?;
    let petition = owned_petition(&state, id, user.id).await?;

    let filename = format!("dilekce_{id}.pdf");
    let output_path = state.config.pdf.output_dir.join(&filename);

    let renderer = state.renderer.clone();
    let content = petition.content.clone();
    let meta = DocumentMeta {
        author: user.full_name.clone(),
        ..DocumentMeta::default()
    };
    let render_path = output_path.clone();
    tokio::task::spawn_blocking(move || renderer.render(&content, &meta, &render_path))
        .await
        .map_err(|e| {
            error!(error = %e, petition_id = %id, "render task panicked");
            ApiError::Rendering
        })??;

    let stored_path = output_path.to_string_lossy();
    Petition::set_pdf_path(&state.db, petition.id, &stored_path)
        .await
        .map_err(|e| {
            error!(error = %e, petition_id = %id, "failed to record pdf path");
            ApiError::Database
        })?;

    let bytes = tokio::fs::read(&output_path).await.map_err(|e| {
        error!(error = %e, path = %output_path.display(), "failed to read rendered pdf");
        ApiError::Rendering
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{filename}\"")
            .parse()
            .map_err(|_| ApiError::Rendering)?,
    );
    Ok((headers, bytes))
}
