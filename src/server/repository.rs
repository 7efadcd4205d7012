use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{Paper, PaperGroup};

/// In-memory paper metadata, newest upload last.
#[derive(Clone, Default)]
pub struct PaperRepository {
    papers: Arc<RwLock<Vec<Paper>>>,
}

impl PaperRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first.
    pub async fn find_all(&self) -> Vec<Paper> {
        self.papers.read().await.iter().rev().cloned().collect()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<Paper> {
        self.papers.read().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn save(&self, paper: &Paper) -> Paper {
        self.papers.write().await.push(paper.clone());
        paper.clone()
    }

    pub async fn delete(&self, id: &str) -> Option<Paper> {
        let mut papers = self.papers.write().await;
        let pos = papers.iter().position(|p| p.id == id)?;
        Some(papers.remove(pos))
    }
}

/// In-memory groups in creation order.
#[derive(Clone, Default)]
pub struct GroupRepository {
    groups: Arc<RwLock<Vec<PaperGroup>>>,
}

impl GroupRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_all(&self) -> Vec<PaperGroup> {
        self.groups.read().await.clone()
    }

    pub async fn find_by_id(&self, id: &str) -> Option<PaperGroup> {
        self.groups.read().await.iter().find(|g| g.id == id).cloned()
    }

    pub async fn save(&self, group: &PaperGroup) -> PaperGroup {
        self.groups.write().await.push(group.clone());
        group.clone()
    }

    /// Applies `f` to the stored group and returns the result.
    pub async fn modify(
        &self,
        id: &str,
        f: impl FnOnce(&mut PaperGroup),
    ) -> Option<PaperGroup> {
        let mut groups = self.groups.write().await;
        let group = groups.iter_mut().find(|g| g.id == id)?;
        f(group);
        Some(group.clone())
    }

    pub async fn delete(&self, id: &str) -> bool {
        let mut groups = self.groups.write().await;
        let before = groups.len();
        groups.retain(|g| g.id != id);
        groups.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: &str) -> Paper {
        Paper {
            id: id.into(),
            filename: format!("{id}.pdf"),
            title: None,
            upload_date: "2024-05-01T00:00:00".into(),
            total_pages: 0,
            total_chunks: 0,
        }
    }

    #[tokio::test]
    async fn papers_are_listed_newest_first() {
        let repo = PaperRepository::new();
        repo.save(&paper("old")).await;
        repo.save(&paper("new")).await;
        let ids: Vec<String> = repo.find_all().await.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["new".to_string(), "old".to_string()]);
        assert_eq!(repo.delete("old").await.map(|p| p.id), Some("old".to_string()));
        assert!(repo.delete("old").await.is_none());
    }

    #[tokio::test]
    async fn modify_unknown_group_is_none() {
        let repo = GroupRepository::new();
        assert!(repo.modify("missing", |g| g.name.clear()).await.is_none());
        assert!(!repo.delete("missing").await);
    }
}
