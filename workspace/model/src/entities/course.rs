use sea_orm::entity::prelude::*;

use super::{enrollment, user};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Semester {
    #[sea_orm(string_value = "fall")]
    Fall,
    #[sea_orm(string_value = "spring")]
    Spring,
    #[sea_orm(string_value = "summer")]
    Summer,
}

/// A course offered in a given semester.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub course_code: String,
    pub title: String,
    pub description: Option<String>,
    pub credits: i32,
    /// Teaching professor. Nulled when that user is deleted.
    pub professor_id: Option<i32>,
    pub department: String,
    pub semester: Semester,
    pub year: i32,
    /// Capacity; enrollments beyond it are rejected.
    pub max_enrollment: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::ProfessorId",
        to = "user::Column::Id",
        on_delete = "SetNull"
    )]
    Professor,
    #[sea_orm(has_many = "enrollment::Entity")]
    Enrollment,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Professor.def()
    }
}

impl Related<enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
