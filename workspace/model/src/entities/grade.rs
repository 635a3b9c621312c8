use sea_orm::entity::prelude::*;

use super::enrollment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum AssignmentType {
    #[sea_orm(string_value = "exam")]
    Exam,
    #[sea_orm(string_value = "homework")]
    Homework,
    #[sea_orm(string_value = "project")]
    Project,
    #[sea_orm(string_value = "quiz")]
    Quiz,
}

/// A single graded assignment of one enrollment.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub enrollment_id: i32,
    pub assignment_name: String,
    pub grade_value: f64,
    pub max_points: f64,
    pub assignment_type: AssignmentType,
    pub recorded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "enrollment::Entity",
        from = "Column::EnrollmentId",
        to = "enrollment::Column::Id",
        on_delete = "Cascade"
    )]
    Enrollment,
}

impl Related<enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
