use crate::errors::ValidationError;
use crate::models::{GroupCreate, GroupUpdate, PaperGroup};

/// Whether the editor creates a new group or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupFormMode {
    Create,
    Edit {
        group_id: String,
        /// Membership when the editor was opened, used to compute the diff.
        original: Vec<String>,
    },
}

/// State behind the group modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupForm {
    pub mode: GroupFormMode,
    pub name: String,
    pub description: String,
    /// Paper ids in the order they were ticked.
    pub selected: Vec<String>,
    pub error: Option<String>,
    pub saving: bool,
}

/// What a valid form turns into on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSubmission {
    Create(GroupCreate),
    Update {
        group_id: String,
        update: GroupUpdate,
    },
}

impl GroupForm {
    pub fn create() -> Self {
        Self {
            mode: GroupFormMode::Create,
            name: String::new(),
            description: String::new(),
            selected: Vec::new(),
            error: None,
            saving: false,
        }
    }

    /// Pre-selects `paper_ids`, e.g. the currently focused paper.
    pub fn create_with(paper_ids: impl IntoIterator<Item = String>) -> Self {
        let mut form = Self::create();
        for id in paper_ids {
            if !form.is_selected(&id) {
                form.selected.push(id);
            }
        }
        form
    }

    pub fn edit(group: &PaperGroup) -> Self {
        Self {
            mode: GroupFormMode::Edit {
                group_id: group.id.clone(),
                original: group.paper_ids.clone(),
            },
            name: group.name.clone(),
            description: group.description.clone().unwrap_or_default(),
            selected: group.paper_ids.clone(),
            error: None,
            saving: false,
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, GroupFormMode::Edit { .. })
    }

    pub fn is_selected(&self, paper_id: &str) -> bool {
        self.selected.iter().any(|id| id == paper_id)
    }

    /// Flips membership of `paper_id`; returns whether it is now selected.
    pub fn toggle(&mut self, paper_id: &str) -> bool {
        if let Some(pos) = self.selected.iter().position(|id| id == paper_id) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(paper_id.to_string());
            true
        }
    }

    /// Validates the form. Only the name is checked.
    pub fn submission(&self) -> Result<GroupSubmission, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyGroupName);
        }
        let description = Some(self.description.trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        match &self.mode {
            GroupFormMode::Create => Ok(GroupSubmission::Create(GroupCreate {
                name: name.to_string(),
                description,
                paper_ids: self.selected.clone(),
            })),
            GroupFormMode::Edit { group_id, original } => {
                let added: Vec<String> = self
                    .selected
                    .iter()
                    .filter(|id| !original.contains(id))
                    .cloned()
                    .collect();
                let removed: Vec<String> = original
                    .iter()
                    .filter(|id| !self.selected.contains(id))
                    .cloned()
                    .collect();
                Ok(GroupSubmission::Update {
                    group_id: group_id.clone(),
                    update: GroupUpdate {
                        name: Some(name.to_string()),
                        description: Some(description.unwrap_or_default()),
                        add_papers: (!added.is_empty()).then_some(added),
                        remove_papers: (!removed.is_empty()).then_some(removed),
                    },
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> PaperGroup {
        PaperGroup {
            id: "g-1".into(),
            name: "Transformers".into(),
            description: Some("Attention papers".into()),
            paper_ids: vec!["p1".into(), "p2".into()],
            created_date: "2024-05-01T00:00:00".into(),
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let mut form = GroupForm::create();
        form.name = "   ".into();
        assert_eq!(form.submission(), Err(ValidationError::EmptyGroupName));
    }

    #[test]
    fn create_keeps_toggle_order_and_trims() {
        let mut form = GroupForm::create();
        form.name = "  Survey ".into();
        assert!(form.toggle("p2"));
        assert!(form.toggle("p1"));
        assert!(form.toggle("p3"));
        assert!(!form.toggle("p1"));

        let GroupSubmission::Create(create) = form.submission().unwrap() else {
            panic!("expected a create submission");
        };
        assert_eq!(create.name, "Survey");
        assert_eq!(create.description, None);
        assert_eq!(create.paper_ids, vec!["p2".to_string(), "p3".to_string()]);
    }

    #[test]
    fn create_with_deduplicates_preselection() {
        let form = GroupForm::create_with(vec!["p1".to_string(), "p1".to_string()]);
        assert_eq!(form.selected, vec!["p1".to_string()]);
    }

    #[test]
    fn edit_submits_membership_diff() {
        let mut form = GroupForm::edit(&group());
        assert!(form.is_edit());
        form.toggle("p1");
        form.toggle("p3");

        let GroupSubmission::Update { group_id, update } = form.submission().unwrap() else {
            panic!("expected an update submission");
        };
        assert_eq!(group_id, "g-1");
        assert_eq!(update.name.as_deref(), Some("Transformers"));
        assert_eq!(update.add_papers, Some(vec!["p3".to_string()]));
        assert_eq!(update.remove_papers, Some(vec!["p1".to_string()]));
    }

    #[test]
    fn unchanged_edit_sends_no_membership_lists() {
        let form = GroupForm::edit(&group());
        let GroupSubmission::Update { update, .. } = form.submission().unwrap() else {
            panic!("expected an update submission");
        };
        assert_eq!(update.add_papers, None);
        assert_eq!(update.remove_papers, None);
        assert_eq!(update.description.as_deref(), Some("Attention papers"));
    }
}
