use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::models::branch::{Branch, Terminal};

#[derive(Debug, Deserialize)]
pub struct CreateBranchRequest {
    pub name: String,
    pub location: Option<String>,
}

#[derive(Serialize)]
pub struct BranchCreatedResponse {
    pub success: bool,
    pub branch: Branch,
}

#[derive(Serialize)]
pub struct BranchView {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub terminals: Vec<Terminal>,
}

#[derive(Serialize)]
pub struct BranchesResponse {
    pub branches: Vec<BranchView>,
}
