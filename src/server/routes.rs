use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use crate::api::UPLOAD_FIELD;
use crate::models::{
    AnswerResponse, CompareQuery, CompareRequest, GroupCreate, GroupDeleted, GroupList,
    GroupUpdate, Health, PaperDeleted, PaperGroup, PaperList, QuestionRequest, UploadReceipt,
};
use crate::server::errors::AppError;
use crate::server::service::LibraryService;

type ApiResult<T> = Result<Json<T>, AppError>;

// ── Health ───────────────────────────────────────────────────────────────────

/// GET `/api/health`
pub async fn health_handler(State(svc): State<LibraryService>) -> Json<Health> {
    Json(svc.health())
}

// ── Papers ───────────────────────────────────────────────────────────────────

/// GET `/api/list_papers`
pub async fn list_papers_handler(State(svc): State<LibraryService>) -> Json<PaperList> {
    let papers = svc.list_papers().await;
    Json(PaperList {
        total: papers.len(),
        papers,
    })
}

/// POST `/api/upload_paper` (multipart, PDF in the `file` field)
pub async fn upload_paper_handler(
    State(svc): State<LibraryService>,
    mut multipart: Multipart,
) -> ApiResult<UploadReceipt> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidUpload(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidUpload(e.to_string()))?;
        info!("Received upload {filename} ({} bytes)", bytes.len());
        return svc.upload_paper(&filename, &bytes).await.map(Json);
    }
    Err(AppError::InvalidUpload(format!(
        "Missing '{UPLOAD_FIELD}' field"
    )))
}

/// DELETE `/api/delete_paper/{id}`
pub async fn delete_paper_handler(
    Path(id): Path<String>,
    State(svc): State<LibraryService>,
) -> ApiResult<PaperDeleted> {
    svc.delete_paper(&id).await.map(Json)
}

// ── Groups ───────────────────────────────────────────────────────────────────

/// GET `/api/groups`
pub async fn list_groups_handler(State(svc): State<LibraryService>) -> Json<GroupList> {
    let groups = svc.list_groups().await;
    Json(GroupList {
        total: groups.len(),
        groups,
    })
}

/// POST `/api/groups`
pub async fn create_group_handler(
    State(svc): State<LibraryService>,
    Json(create): Json<GroupCreate>,
) -> Result<(StatusCode, Json<PaperGroup>), AppError> {
    let group = svc.create_group(create).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET `/api/groups/{id}`
pub async fn get_group_handler(
    Path(id): Path<String>,
    State(svc): State<LibraryService>,
) -> ApiResult<PaperGroup> {
    svc.get_group(&id).await.map(Json)
}

/// PUT `/api/groups/{id}`
pub async fn update_group_handler(
    Path(id): Path<String>,
    State(svc): State<LibraryService>,
    Json(update): Json<GroupUpdate>,
) -> ApiResult<PaperGroup> {
    svc.update_group(&id, update).await.map(Json)
}

/// DELETE `/api/groups/{id}`
pub async fn delete_group_handler(
    Path(id): Path<String>,
    State(svc): State<LibraryService>,
) -> ApiResult<GroupDeleted> {
    svc.delete_group(&id).await.map(Json)
}

/// POST `/api/groups/{id}/papers` with a bare array of paper ids
pub async fn add_papers_handler(
    Path(id): Path<String>,
    State(svc): State<LibraryService>,
    Json(paper_ids): Json<Vec<String>>,
) -> ApiResult<PaperGroup> {
    svc.add_papers_to_group(&id, paper_ids).await.map(Json)
}

/// DELETE `/api/groups/{id}/papers/{paper_id}`
pub async fn remove_paper_handler(
    Path((id, paper_id)): Path<(String, String)>,
    State(svc): State<LibraryService>,
) -> ApiResult<PaperGroup> {
    svc.remove_paper_from_group(&id, &paper_id).await.map(Json)
}

// ── Questions ────────────────────────────────────────────────────────────────

/// POST `/api/ask_question`
pub async fn ask_question_handler(
    State(svc): State<LibraryService>,
    Json(request): Json<QuestionRequest>,
) -> ApiResult<AnswerResponse> {
    svc.ask_question(request).await.map(Json)
}

/// POST `/api/compare_papers?question=..&mode=..` with a bare array of paper ids
pub async fn compare_papers_handler(
    State(svc): State<LibraryService>,
    Query(query): Query<CompareQuery>,
    Json(paper_ids): Json<Vec<String>>,
) -> ApiResult<AnswerResponse> {
    svc.compare_papers(CompareRequest {
        question: query.question,
        paper_ids,
        mode: query.mode,
    })
    .await
    .map(Json)
}
