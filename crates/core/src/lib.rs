#![forbid(unsafe_code)]

pub mod drag;
pub mod tree;

pub use drag::{DragCoordinator, DragGesture, DropPlan, DualTreeView, PendingDrop, apply_plan};
pub use tree::{
    FlattenedItem, NestingWindow, PageMeta, PageTree, TreeDestinationPosition, TreeSourcePosition,
    TreeViewNode,
};

pub mod ids {
    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct WorkspaceId(String);

    impl WorkspaceId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, WorkspaceIdError> {
            let value = value.into();
            validate_workspace_id(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum WorkspaceIdError {
        Empty,
        TooLong,
        InvalidFirstChar,
        InvalidChar { ch: char, index: usize },
    }

    fn validate_workspace_id(value: &str) -> Result<(), WorkspaceIdError> {
        if value.is_empty() {
            return Err(WorkspaceIdError::Empty);
        }
        if value.len() > 128 {
            return Err(WorkspaceIdError::TooLong);
        }
        let mut chars = value.chars();
        let Some(first) = chars.next() else {
            return Err(WorkspaceIdError::Empty);
        };
        if !first.is_ascii_alphanumeric() {
            return Err(WorkspaceIdError::InvalidFirstChar);
        }
        for (index, ch) in value.chars().enumerate() {
            if index == 0 {
                continue;
            }
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '/' | '-') {
                continue;
            }
            return Err(WorkspaceIdError::InvalidChar { ch, index });
        }
        Ok(())
    }

    /// Page identifiers end up inside materialized paths that are matched
    /// with `LIKE prefix || '%'`, so the alphabet excludes `%`, `_` and the
    /// `.` separator to keep every prefix literal.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct PageId(String);

    impl PageId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, PageIdError> {
            let value = value.into();
            validate_page_id(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum PageIdError {
        Empty,
        TooLong,
        InvalidChar { ch: char, index: usize },
    }

    fn validate_page_id(value: &str) -> Result<(), PageIdError> {
        if value.is_empty() {
            return Err(PageIdError::Empty);
        }
        if value.len() > 128 {
            return Err(PageIdError::TooLong);
        }
        for (index, ch) in value.chars().enumerate() {
            if ch.is_ascii_alphanumeric() || ch == '-' {
                continue;
            }
            return Err(PageIdError::InvalidChar { ch, index });
        }
        Ok(())
    }

    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct PaneId(String);

    impl PaneId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, PaneIdError> {
            let value = value.into();
            validate_pane_id(&value)?;
            Ok(Self(value))
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum PaneIdError {
        Empty,
        TooLong,
        InvalidChar { ch: char, index: usize },
    }

    fn validate_pane_id(value: &str) -> Result<(), PaneIdError> {
        if value.is_empty() {
            return Err(PaneIdError::Empty);
        }
        if value.len() > 64 {
            return Err(PaneIdError::TooLong);
        }
        for (index, ch) in value.chars().enumerate() {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
                continue;
            }
            return Err(PaneIdError::InvalidChar { ch, index });
        }
        Ok(())
    }

}
