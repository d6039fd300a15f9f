#![forbid(unsafe_code)]

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertPageRequest {
    pub id: String,
    pub parent_id: Option<String>,
    pub title: String,
    /// Slot in the parent's sibling order; append when `None`.
    pub index: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovePageRequest {
    pub id: String,
    /// `None` promotes the page to a workspace root.
    pub new_parent_id: Option<String>,
    /// Slot in the new parent's sibling order; append when `None`.
    pub new_index: Option<usize>,
}
