use crate::backend::{CategoryOption, ResolvedSelection};

/// Multi-select over the column names offered by the backend, with a live
/// search filter. `available` is the master list and is never reordered or
/// filtered in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnPicker {
    available: Vec<String>,
    selected: Vec<String>,
    search_query: String,
}

impl ColumnPicker {
    pub fn new(available: Vec<String>) -> Self {
        Self {
            available,
            selected: Vec::new(),
            search_query: String::new(),
        }
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn is_selected(&self, column: &str) -> bool {
        self.selected.iter().any(|selected| selected == column)
    }

    pub fn set_selected(&mut self, column: &str, checked: bool) {
        if checked {
            if !self.is_selected(column) {
                self.selected.push(column.to_string());
            }
        } else {
            self.selected.retain(|selected| selected != column);
        }
    }

    pub fn toggle(&mut self, column: &str) {
        let checked = !self.is_selected(column);
        self.set_selected(column, checked);
    }

    pub fn select_all(&mut self) {
        self.selected = self.available.clone();
    }

    pub fn deselect_all(&mut self) {
        self.selected.clear();
    }

    pub fn all_selected(&self) -> bool {
        !self.available.is_empty() && self.selected.len() == self.available.len()
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn clear_search(&mut self) {
        self.search_query.clear();
    }

    /// Case-insensitive substring match of the search query over the master list.
    pub fn filtered(&self) -> Vec<&str> {
        let query = self.search_query.trim().to_lowercase();
        self.available
            .iter()
            .map(String::as_str)
            .filter(|column| query.is_empty() || column.to_lowercase().contains(&query))
            .collect()
    }
}

/// The disambiguation round the backend asked for. Each case carries only
/// its own options and the user's choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRound {
    Metric {
        options: Vec<String>,
        selected: Option<String>,
    },
    Category {
        options: Vec<CategoryOption>,
        selected: Option<String>,
    },
    Columns(ColumnPicker),
}

impl SelectionRound {
    pub fn metric(options: Vec<String>) -> Self {
        Self::Metric {
            options,
            selected: None,
        }
    }

    pub fn category(options: Vec<CategoryOption>) -> Self {
        Self::Category {
            options,
            selected: None,
        }
    }

    pub fn columns(options: Vec<String>) -> Self {
        Self::Columns(ColumnPicker::new(options))
    }

    pub fn kind(&self) -> SelectionKind {
        match self {
            Self::Metric { .. } => SelectionKind::Metric,
            Self::Category { .. } => SelectionKind::Category,
            Self::Columns(_) => SelectionKind::Columns,
        }
    }

    /// The value to send back, if the user has made one.
    pub fn resolved(&self) -> Option<ResolvedSelection> {
        match self {
            Self::Metric { selected, .. } => selected
                .as_ref()
                .filter(|value| !value.is_empty())
                .map(|value| ResolvedSelection::Metric(value.clone())),
            Self::Category { selected, .. } => selected
                .as_ref()
                .filter(|value| !value.is_empty())
                .map(|value| ResolvedSelection::Category(value.clone())),
            Self::Columns(picker) => (!picker.selected().is_empty())
                .then(|| ResolvedSelection::Columns(picker.selected().to_vec())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Metric,
    Category,
    Columns,
}
