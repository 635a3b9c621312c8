use sea_orm_migration::{prelude::*, schema::*};

use crate::m20240901_000001_create_accounts::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create students table (one profile per student-role user)
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(pk_auto(Students::Id))
                    .col(integer(Students::UserId).unique_key())
                    .col(string_len(Students::StudentNumber, 20).unique_key())
                    .col(string_len(Students::Major, 100))
                    .col(string_len(Students::YearLevel, 20))
                    .col(double(Students::Gpa).default(0.0))
                    .col(integer(Students::TotalCredits).default(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_students_user")
                            .from(Students::Table, Students::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(pk_auto(Courses::Id))
                    .col(string_len(Courses::CourseCode, 20).unique_key())
                    .col(string_len(Courses::Title, 200))
                    .col(text_null(Courses::Description))
                    .col(integer(Courses::Credits).default(3))
                    .col(integer_null(Courses::ProfessorId))
                    .col(string_len(Courses::Department, 100))
                    .col(string_len(Courses::Semester, 20))
                    .col(integer(Courses::Year))
                    .col(integer(Courses::MaxEnrollment).default(30))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_courses_professor")
                            .from(Courses::Table, Courses::ProfessorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrollments table (join between students and courses)
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(pk_auto(Enrollments::Id))
                    .col(integer(Enrollments::StudentId))
                    .col(integer(Enrollments::CourseId))
                    .col(timestamp_with_time_zone(Enrollments::EnrolledAt))
                    .col(string_len(Enrollments::Status, 20).default("enrolled"))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_student")
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_enrollments_course")
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_enrollments_student_course")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Create grades table
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(pk_auto(Grades::Id))
                    .col(integer(Grades::EnrollmentId))
                    .col(string_len(Grades::AssignmentName, 200))
                    .col(double(Grades::GradeValue))
                    .col(double(Grades::MaxPoints).default(100.0))
                    .col(string_len(Grades::AssignmentType, 50))
                    .col(timestamp_with_time_zone(Grades::RecordedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grades_enrollment")
                            .from(Grades::Table, Grades::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Students {
    Table,
    Id,
    UserId,
    StudentNumber,
    Major,
    YearLevel,
    Gpa,
    TotalCredits,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
    CourseCode,
    Title,
    Description,
    Credits,
    ProfessorId,
    Department,
    Semester,
    Year,
    MaxEnrollment,
}

#[derive(DeriveIden)]
enum Enrollments {
    Table,
    Id,
    StudentId,
    CourseId,
    EnrolledAt,
    Status,
}

#[derive(DeriveIden)]
enum Grades {
    Table,
    Id,
    EnrollmentId,
    AssignmentName,
    GradeValue,
    MaxPoints,
    AssignmentType,
    RecordedAt,
}
