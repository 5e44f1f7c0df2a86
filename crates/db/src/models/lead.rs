//! Sales lead model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use xeetrack_core::types::{DbId, Timestamp};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: DbId,
    pub name: String,
    pub contact_info: Option<String>,
    pub estimated_amount: f64,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLead {
    pub name: String,
    pub contact_info: Option<String>,
    #[serde(default)]
    pub estimated_amount: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLead {
    pub name: Option<String>,
    pub contact_info: Option<String>,
    pub estimated_amount: Option<f64>,
    pub notes: Option<String>,
}

/// Pipeline totals across all leads.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LeadPipeline {
    pub lead_count: i64,
    pub total_amount: f64,
    pub average_amount: f64,
}
