use crate::handlers::{
    auth::{change_password, login, logout, me, register},
    courses::{courses_for_user, create_course, enroll, get_course, list_courses, my_courses},
    enrollments::delete_enrollment,
    grades::{course_grades, create_grade, list_grades, my_grades},
    health::health_check,
    pages,
    students::{delete_student, get_my_profile, get_student, list_students, update_my_profile},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Form pages
        .route("/", get(pages::index))
        .route("/login", get(pages::login_form).post(pages::login_submit))
        .route("/signup", get(pages::signup_form).post(pages::signup_submit))
        .route("/dashboard", get(pages::dashboard))
        .route("/items", get(pages::items_page).post(pages::create_item))
        .route("/delete-item/:item_id", post(pages::delete_item))
        .route("/settings", get(pages::settings_form).post(pages::settings_submit))
        .route("/admin", get(pages::admin_page))
        .route("/admin/add-user", post(pages::admin_add_user))
        .route("/admin/delete-user/:user_id", post(pages::admin_delete_user))
        .route("/logout", get(pages::logout))
        // Auth routes
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/auth/password", put(change_password))
        // Student routes
        .route("/api/students", get(list_students))
        .route("/api/students/profile", get(get_my_profile).put(update_my_profile))
        .route("/api/students/:student_id", get(get_student).delete(delete_student))
        // Course routes
        .route("/api/courses", get(list_courses).post(create_course))
        .route("/api/courses/my-courses", get(my_courses))
        .route("/api/courses/:course_id", get(get_course))
        .route("/api/courses/:course_id/enroll", post(enroll))
        // Grade routes
        .route("/api/grades", get(list_grades).post(create_grade))
        .route("/api/grades/course/:course_id", get(course_grades))
        .route("/api/grades/my-grades", get(my_grades))
        // Enrollment routes
        .route("/api/enrollments/:enrollment_id", delete(delete_enrollment))
        // Flat aliases
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/api/my-courses/:user_id", get(courses_for_user))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .with_state(state)
}
