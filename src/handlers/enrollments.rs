use axum::{extract::State, response::Json};
use common::EnrollmentDto;
use service::{dto, enrollments};
use tracing::{info, instrument, warn};

use crate::auth::AuthContext;
use crate::error::ApiError;
use crate::extract::ApiPath;
use crate::schemas::{ApiResponse, AppState};

/// Drop an enrollment and its grades
///
/// Allowed for the enrolled student, the professor of the course and admins.
#[utoipa::path(
    delete,
    path = "/api/enrollments/{enrollment_id}",
    tag = "enrollments",
    params(
        ("enrollment_id" = i32, Path, description = "Enrollment ID"),
    ),
    responses(
        (status = 200, description = "Enrollment deleted successfully", body = EnrollmentResponse),
        (status = 403, description = "Not allowed to manage this enrollment", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, auth), fields(user_id = auth.user_id()))]
pub async fn delete_enrollment(
    ApiPath(enrollment_id): ApiPath<i32>,
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ApiResponse<EnrollmentDto>>, ApiError> {
    let record = enrollments::find_enrollment(&state.db, enrollment_id).await?;
    if !enrollments::can_manage_enrollment(&state.db, &auth.user, &record).await? {
        warn!(
            "User {} may not manage enrollment {}",
            auth.user_id(),
            enrollment_id
        );
        return Err(ApiError::forbidden("Access denied"));
    }

    enrollments::delete_enrollment(&state.db, enrollment_id).await?;
    info!("Enrollment {} deleted by user {}", enrollment_id, auth.user_id());
    Ok(Json(ApiResponse::ok(
        dto::enrollment_dto(&record, None),
        "Enrollment deleted successfully",
    )))
}
