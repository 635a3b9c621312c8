#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();

        assert!(components.schemas.contains_key("ErrorResponse"));
        assert!(components.schemas.contains_key("HealthResponse"));
        assert!(components.schemas.contains_key("CreateCourseRequest"));
        assert!(components.schemas.contains_key("GradeDto"));

        let json_result = serde_json::to_string(&openapi);
        assert!(json_result.is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let error_response_schema = components.schemas.get("ErrorResponse").unwrap();

        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) = error_response_schema {
            let properties = &obj.properties;
            assert!(properties.contains_key("error"));
            assert!(properties.contains_key("code"));
            assert!(properties.contains_key("success"));
        } else {
            panic!("ErrorResponse should be an object schema");
        }
    }

    #[test]
    fn test_health_response_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let health_response_schema = components.schemas.get("HealthResponse").unwrap();

        if let utoipa::openapi::RefOr::T(utoipa::openapi::schema::Schema::Object(obj)) = health_response_schema {
            let properties = &obj.properties;
            assert!(properties.contains_key("status"));
            assert!(properties.contains_key("version"));
            assert!(properties.contains_key("database"));
        } else {
            panic!("HealthResponse should be an object schema");
        }
    }

    #[test]
    fn test_documented_paths() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        for path in [
            "/health",
            "/api/auth/register",
            "/api/auth/login",
            "/api/students/{student_id}",
            "/api/courses",
            "/api/courses/{course_id}/enroll",
            "/api/grades/my-grades",
            "/api/enrollments/{enrollment_id}",
            "/api/my-courses/{user_id}",
        ] {
            assert!(paths.contains_key(path), "missing path {}", path);
        }
    }
}
