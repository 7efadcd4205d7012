use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{
    AnswerResponse, Citation, CompareRequest, GroupCreate, GroupDeleted, GroupUpdate, Health,
    Paper, PaperDeleted, PaperGroup, QuestionRequest, UploadReceipt, MIN_COMPARE_PAPERS,
};
use crate::server::errors::AppError;
use crate::server::repository::{GroupRepository, PaperRepository};

const MAX_GROUP_NAME: usize = 100;
const MAX_GROUP_DESCRIPTION: usize = 500;
const MIN_QUESTION: usize = 3;
const MAX_QUESTION: usize = 1000;
const MAX_TOP_K: u32 = 10;
const PREVIEW_CHARS: usize = 100;

/// Metadata bookkeeping behind the development API. No retrieval happens
/// here: answers are canned and cite the first page of each paper in scope.
#[derive(Clone)]
pub struct LibraryService {
    papers: PaperRepository,
    groups: GroupRepository,
}

impl LibraryService {
    pub fn new(papers: PaperRepository, groups: GroupRepository) -> Self {
        Self { papers, groups }
    }

    pub fn health(&self) -> Health {
        Health {
            status: "healthy".to_string(),
            vector_store: "in-memory".to_string(),
        }
    }

    // ── Papers ───────────────────────────────────────────────────────────────

    pub async fn list_papers(&self) -> Vec<Paper> {
        self.papers.find_all().await
    }

    pub async fn upload_paper(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> Result<UploadReceipt, AppError> {
        if !filename.to_lowercase().ends_with(".pdf") {
            return Err(AppError::NotPdf);
        }
        if !bytes.starts_with(b"%PDF") {
            warn!("Rejected upload {filename}: missing PDF header");
            return Err(AppError::InvalidUpload(
                "Could not extract text from PDF".to_string(),
            ));
        }

        let title = filename
            .rsplit_once('.')
            .map_or(filename, |(stem, _)| stem)
            .to_string();
        let paper = Paper {
            id: Uuid::new_v4().to_string()[..8].to_string(),
            filename: filename.to_string(),
            title: Some(title.clone()),
            upload_date: timestamp(),
            total_pages: count_pages(bytes),
            total_chunks: 0,
        };
        self.papers.save(&paper).await;
        info!("Stored paper {} ({} pages)", paper.id, paper.total_pages);

        Ok(UploadReceipt {
            success: true,
            paper_id: paper.id,
            filename: paper.filename,
            message: format!("Successfully processed paper: {title}"),
            total_chunks: paper.total_chunks,
            total_pages: paper.total_pages,
        })
    }

    pub async fn delete_paper(&self, paper_id: &str) -> Result<PaperDeleted, AppError> {
        let paper = self
            .papers
            .delete(paper_id)
            .await
            .ok_or_else(|| AppError::PaperNotFound {
                id: paper_id.to_string(),
            })?;
        Ok(PaperDeleted {
            success: true,
            paper_id: paper.id.clone(),
            message: format!("Successfully deleted paper: {}", paper.display_name()),
        })
    }

    // ── Groups ───────────────────────────────────────────────────────────────

    pub async fn list_groups(&self) -> Vec<PaperGroup> {
        self.groups.find_all().await
    }

    pub async fn get_group(&self, group_id: &str) -> Result<PaperGroup, AppError> {
        self.groups
            .find_by_id(group_id)
            .await
            .ok_or_else(|| group_not_found(group_id))
    }

    pub async fn create_group(&self, create: GroupCreate) -> Result<PaperGroup, AppError> {
        validate_name(&create.name)?;
        validate_description(create.description.as_deref())?;

        let mut paper_ids = Vec::new();
        merge_ids(&mut paper_ids, &create.paper_ids);
        let group = PaperGroup {
            id: Uuid::new_v4().to_string(),
            name: create.name,
            description: create.description,
            paper_ids,
            created_date: timestamp(),
        };
        Ok(self.groups.save(&group).await)
    }

    pub async fn update_group(
        &self,
        group_id: &str,
        update: GroupUpdate,
    ) -> Result<PaperGroup, AppError> {
        if let Some(name) = &update.name {
            validate_name(name)?;
        }
        validate_description(update.description.as_deref())?;

        self.groups
            .modify(group_id, |group| {
                if let Some(name) = update.name {
                    group.name = name;
                }
                if let Some(description) = update.description {
                    group.description = Some(description);
                }
                if let Some(added) = &update.add_papers {
                    merge_ids(&mut group.paper_ids, added);
                }
                if let Some(removed) = &update.remove_papers {
                    group.paper_ids.retain(|id| !removed.contains(id));
                }
            })
            .await
            .ok_or_else(|| group_not_found(group_id))
    }

    pub async fn delete_group(&self, group_id: &str) -> Result<GroupDeleted, AppError> {
        if !self.groups.delete(group_id).await {
            return Err(group_not_found(group_id));
        }
        Ok(GroupDeleted {
            success: true,
            group_id: group_id.to_string(),
            message: "Group deleted successfully".to_string(),
        })
    }

    pub async fn add_papers_to_group(
        &self,
        group_id: &str,
        paper_ids: Vec<String>,
    ) -> Result<PaperGroup, AppError> {
        self.update_group(
            group_id,
            GroupUpdate {
                add_papers: Some(paper_ids),
                ..GroupUpdate::default()
            },
        )
        .await
    }

    pub async fn remove_paper_from_group(
        &self,
        group_id: &str,
        paper_id: &str,
    ) -> Result<PaperGroup, AppError> {
        self.update_group(
            group_id,
            GroupUpdate {
                remove_papers: Some(vec![paper_id.to_string()]),
                ..GroupUpdate::default()
            },
        )
        .await
    }

    // ── Questions ────────────────────────────────────────────────────────────

    pub async fn ask_question(&self, request: QuestionRequest) -> Result<AnswerResponse, AppError> {
        validate_question(&request.question)?;
        if !(1..=MAX_TOP_K).contains(&request.top_k) {
            return Err(AppError::OutOfRange {
                field_name: "top_k".to_string(),
                min: 1,
                max: MAX_TOP_K,
                actual: request.top_k,
            });
        }

        let scope = self.scope(&request).await?;
        let citations: Vec<Citation> = scope
            .iter()
            .take(request.top_k as usize)
            .map(first_page)
            .collect();

        let answer = if citations.is_empty() {
            "No papers are available to answer this question. Upload a PDF first.".to_string()
        } else {
            format!(
                "This development server does not run retrieval. Your {} question was \
                 scoped to {} paper(s).",
                request.mode,
                scope.len()
            )
        };

        Ok(AnswerResponse {
            answer,
            retrieved_chunks: citations.len() as u32,
            citations,
            question: request.question,
            mode: request.mode,
        })
    }

    /// Compares the given papers. Every id must exist; at least two are needed.
    pub async fn compare_papers(
        &self,
        request: CompareRequest,
    ) -> Result<AnswerResponse, AppError> {
        validate_question(&request.question)?;
        if request.paper_ids.len() < MIN_COMPARE_PAPERS {
            return Err(AppError::TooFewPapers {
                min: MIN_COMPARE_PAPERS,
                actual: request.paper_ids.len(),
            });
        }

        let mut papers = Vec::with_capacity(request.paper_ids.len());
        for paper_id in &request.paper_ids {
            let paper = self
                .papers
                .find_by_id(paper_id)
                .await
                .ok_or_else(|| AppError::PaperNotFound {
                    id: paper_id.clone(),
                })?;
            papers.push(paper);
        }
        let names: Vec<&str> = papers.iter().map(Paper::display_name).collect();
        let citations: Vec<Citation> = papers.iter().map(first_page).collect();

        Ok(AnswerResponse {
            answer: format!(
                "This development server does not run retrieval. Your {} comparison \
                 covered: {}.",
                request.mode,
                names.join(", ")
            ),
            retrieved_chunks: citations.len() as u32,
            citations,
            question: request.question,
            mode: request.mode,
        })
    }

    /// Papers a question applies to: the group's, the single paper, or all.
    async fn scope(&self, request: &QuestionRequest) -> Result<Vec<Paper>, AppError> {
        let all = self.papers.find_all().await;
        if let Some(group_id) = &request.group_id {
            let group = self.get_group(group_id).await?;
            return Ok(all.into_iter().filter(|p| group.contains(&p.id)).collect());
        }
        if let Some(paper_id) = &request.paper_id {
            let paper = self
                .papers
                .find_by_id(paper_id)
                .await
                .ok_or_else(|| AppError::PaperNotFound {
                    id: paper_id.clone(),
                })?;
            return Ok(vec![paper]);
        }
        Ok(all)
    }
}

fn first_page(paper: &Paper) -> Citation {
    Citation {
        paper_id: paper.id.clone(),
        page: 1,
        section: "Abstract".to_string(),
        chunk_preview: paper.display_name().chars().take(PREVIEW_CHARS).collect(),
    }
}

fn validate_question(question: &str) -> Result<(), AppError> {
    let length = question.chars().count();
    if length < MIN_QUESTION {
        return Err(AppError::FieldTooShort {
            field_name: "question".to_string(),
            min_length: MIN_QUESTION,
            actual_length: length,
        });
    }
    if length > MAX_QUESTION {
        return Err(AppError::FieldTooLong {
            field_name: "question".to_string(),
            max_length: MAX_QUESTION,
            actual_length: length,
        });
    }
    Ok(())
}

fn group_not_found(group_id: &str) -> AppError {
    AppError::GroupNotFound {
        id: group_id.to_string(),
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    let length = name.chars().count();
    if length == 0 {
        return Err(AppError::EmptyField {
            field_name: "name".to_string(),
        });
    }
    if length > MAX_GROUP_NAME {
        return Err(AppError::FieldTooLong {
            field_name: "name".to_string(),
            max_length: MAX_GROUP_NAME,
            actual_length: length,
        });
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), AppError> {
    let length = description.map_or(0, |d| d.chars().count());
    if length > MAX_GROUP_DESCRIPTION {
        return Err(AppError::FieldTooLong {
            field_name: "description".to_string(),
            max_length: MAX_GROUP_DESCRIPTION,
            actual_length: length,
        });
    }
    Ok(())
}

/// Appends ids not yet present, keeping first-seen order.
fn merge_ids(target: &mut Vec<String>, ids: &[String]) {
    for id in ids {
        if !target.contains(id) {
            target.push(id.clone());
        }
    }
}

/// Naive page count from `/Type /Page` object markers (`/Pages` excluded).
fn count_pages(bytes: &[u8]) -> u32 {
    let mut pages = 0;
    for marker in [b"/Type /Page".as_slice(), b"/Type/Page".as_slice()] {
        pages += bytes
            .windows(marker.len())
            .enumerate()
            .filter(|(i, window)| *window == marker && bytes.get(i + marker.len()) != Some(&b's'))
            .count();
    }
    pages as u32
}

fn timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
