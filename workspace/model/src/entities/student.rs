use sea_orm::entity::prelude::*;

use super::{enrollment, user};

/// Academic year of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum YearLevel {
    #[sea_orm(string_value = "freshman")]
    Freshman,
    #[sea_orm(string_value = "sophomore")]
    Sophomore,
    #[sea_orm(string_value = "junior")]
    Junior,
    #[sea_orm(string_value = "senior")]
    Senior,
}

/// Student profile attached to a student-role user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    /// Public identifier, `STU` followed by the zero-padded user id.
    #[sea_orm(unique)]
    pub student_number: String,
    pub major: String,
    pub year_level: YearLevel,
    pub gpa: f64,
    pub total_credits: i32,
}

/// Builds the public student number for a user id, e.g. `STU000042`.
pub fn student_number_for(user_id: i32) -> String {
    format!("STU{:06}", user_id)
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "enrollment::Entity")]
    Enrollment,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
