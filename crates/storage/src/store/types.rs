#![forbid(unsafe_code)]

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRow {
    pub id: String,
    /// `None` only for a workspace root.
    pub parent_id: Option<String>,
    /// Dot-joined ancestor chain including self, trailing dot (`"A.B.C."`).
    pub mpath: String,
    /// Sibling order of immediate children; the single source of truth.
    pub children_order: Vec<String>,
    pub title: String,
    /// Derived: true when a public address is bound to this page.
    pub address_bound: bool,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressRow {
    pub page_id: String,
    pub address: String,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrantRow {
    pub page_id: String,
    pub grantee: String,
    pub role: String,
    pub created_at_ms: i64,
}
