pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod grades;
pub mod health;
pub mod pages;
pub mod students;
