use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "work_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Username of the submitter, taken from the session identity.
    pub team_member: String,

    /// Nominally one of the fixed catalog names; arbitrary strings accepted.
    pub function: String,

    /// `YYYY-MM-DD`; null when the submitted value failed to parse.
    pub date: Option<String>,

    pub file_number: Option<String>,

    pub status: Option<String>,

    pub tier1_escalation_reason: Option<String>,

    pub im_escalation_reason: Option<String>,

    pub department: Option<String>,

    pub comments: Option<String>,

    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
