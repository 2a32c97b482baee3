use std::sync::Arc;

use actix_web::web::Data;
use actix_web::{Error, HttpResponse};
use paperclip::actix::{api_v2_operation, web};

use crate::api::{
    CreatePathRequest, CreatePathResponse, CreateUserResponse, FeedbackRequest,
    FeedbackResponse, HealthResponse, LikedPathsQuery, LikedPathsResponse, RecommendRequest,
};
use crate::walk_repository::WalkRepository;
use crate::{feedback, paths, recommendations, users};

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().json(HealthResponse { ok: true }))
}

#[api_v2_operation]
pub async fn create_user(
    repository: Data<Arc<dyn WalkRepository>>,
) -> Result<HttpResponse, Error> {
    let user_id = users::create_user(repository.get_ref().as_ref()).await?;
    Ok(HttpResponse::Ok().json(CreateUserResponse { user_id }))
}

#[api_v2_operation]
pub async fn create_path(
    repository: Data<Arc<dyn WalkRepository>>,
    request: web::Json<CreatePathRequest>,
) -> Result<HttpResponse, Error> {
    let path_id = paths::create_path(repository.get_ref().as_ref(), request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CreatePathResponse { path_id }))
}

#[api_v2_operation]
pub async fn get_liked_paths(
    repository: Data<Arc<dyn WalkRepository>>,
    query: web::Query<LikedPathsQuery>,
) -> Result<HttpResponse, Error> {
    let LikedPathsQuery { user_id, limit } = query.into_inner();
    let paths = paths::get_liked_paths(repository.get_ref().as_ref(), user_id, limit).await?;
    Ok(HttpResponse::Ok().json(LikedPathsResponse { paths }))
}

#[api_v2_operation]
pub async fn create_feedback(
    repository: Data<Arc<dyn WalkRepository>>,
    request: web::Json<FeedbackRequest>,
) -> Result<HttpResponse, Error> {
    let feedback_id =
        feedback::create_feedback(repository.get_ref().as_ref(), request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(FeedbackResponse { feedback_id }))
}

#[api_v2_operation]
pub async fn recommend_routes(
    repository: Data<Arc<dyn WalkRepository>>,
    request: web::Json<RecommendRequest>,
) -> Result<HttpResponse, Error> {
    let response =
        recommendations::recommend(repository.get_ref().as_ref(), request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod handler_tests {
    use std::sync::Arc;

    use actix_web::http::header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN};
    use actix_web::http::StatusCode;
    use actix_web::web::Data;
    use actix_web::{test, App};
    use paperclip::actix::OpenApiExt;
    use serde_json::json;

    use crate::api::{
        CreatePathResponse, CreateUserResponse, ErrorResponse, FeedbackResponse, HealthResponse,
        LikedPathsResponse, PathId, RecommendResponse, RouteSource, UserId,
    };
    use crate::app_config::{config_app, cors, json_config, query_config};
    use crate::recommendations::NO_LIKED_ROUTES_NOTE;
    use crate::walk_repository::{InMemoryWalkRepository, WalkRepository};

    macro_rules! init_app {
        ($allowed_origins:expr) => {{
            let repository: Arc<dyn WalkRepository> = Arc::new(InMemoryWalkRepository::default());
            test::init_service(
                App::new()
                    .wrap_api()
                    .app_data(Data::new(repository))
                    .app_data(json_config())
                    .app_data(query_config())
                    .wrap(cors($allowed_origins))
                    .configure(config_app)
                    .build(),
            )
            .await
        }};
    }

    macro_rules! post_json {
        ($app:expr, $uri:expr, $body:expr) => {
            test::call_service(
                &$app,
                test::TestRequest::post()
                    .uri($uri)
                    .set_json($body)
                    .to_request(),
            )
            .await
        };
    }

    macro_rules! create_user {
        ($app:expr) => {{
            let created: CreateUserResponse = test::call_and_read_body_json(
                &$app,
                test::TestRequest::post().uri("/users").to_request(),
            )
            .await;
            created.user_id
        }};
    }

    macro_rules! create_path {
        ($app:expr, $user_id:expr) => {{
            let response = post_json!(
                $app,
                "/paths",
                json!({"userId": $user_id, "minutes": 30, "distanceM": 2000, "durationSec": 1500})
            );
            assert_eq!(response.status(), StatusCode::OK);
            let created: CreatePathResponse = test::read_body_json(response).await;
            created.path_id
        }};
    }

    #[actix_web::test]
    async fn test_health() {
        let app = init_app!(&[]);

        let health: HealthResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/health").to_request(),
        )
        .await;

        assert!(health.ok);
    }

    #[actix_web::test]
    /// Create user, log path, like it and ask for recommendations
    async fn test_like_then_recommend() {
        let app = init_app!(&[]);
        let user_id = create_user!(app);
        let path_id = create_path!(app, user_id);

        let response = post_json!(
            app,
            "/feedback",
            json!({"userId": user_id, "pathId": path_id, "value": 1})
        );
        assert_eq!(response.status(), StatusCode::OK);
        let _: FeedbackResponse = test::read_body_json(response).await;

        let response = post_json!(
            app,
            "/routes/recommend",
            json!({"userId": user_id, "minutes": 20, "start": {"lat": 0.0, "lng": 0.0}})
        );
        assert_eq!(response.status(), StatusCode::OK);
        let recommended: RecommendResponse = test::read_body_json(response).await;

        assert_eq!(recommended.note, None);
        assert_eq!(recommended.routes.len(), 3);
        for route in recommended.routes.iter() {
            assert_eq!(route.path_id, path_id);
            assert_eq!(route.source, RouteSource::Liked);
        }

        let liked: LikedPathsResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/paths/liked?user_id={user_id}"))
                .to_request(),
        )
        .await;
        assert_eq!(liked.paths.len(), 1);
        assert_eq!(liked.paths[0].id, path_id);
        assert_eq!(liked.paths[0].distance_m, 2000);
    }

    #[actix_web::test]
    async fn test_recommend_without_likes() {
        let app = init_app!(&[]);
        let user_id = create_user!(app);

        let response = post_json!(
            app,
            "/routes/recommend",
            json!({"userId": user_id, "minutes": 20, "start": {"lat": 52.2, "lng": 21.0}})
        );
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(response).await;

        assert_eq!(body, json!({"routes": [], "note": NO_LIKED_ROUTES_NOTE}));
    }

    #[actix_web::test]
    async fn test_create_path_for_unknown_user() {
        let app = init_app!(&[]);

        let response = post_json!(
            app,
            "/paths",
            json!({"userId": UserId::new_random(), "minutes": 30, "distanceM": 2000, "durationSec": 1500})
        );

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(error.detail, "user not found");
    }

    #[actix_web::test]
    async fn test_feedback_errors() {
        let app = init_app!(&[]);
        let user_id = create_user!(app);
        let path_id = create_path!(app, user_id);

        let response = post_json!(
            app,
            "/feedback",
            json!({"userId": UserId::new_random(), "pathId": PathId::new_random(), "value": 5})
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(error.detail, "value must be 1 or -1");

        let response = post_json!(
            app,
            "/feedback",
            json!({"userId": UserId::new_random(), "pathId": path_id, "value": -1})
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(error.detail, "user not found");

        let response = post_json!(
            app,
            "/feedback",
            json!({"userId": user_id, "pathId": PathId::new_random(), "value": -1})
        );
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = test::read_body_json(response).await;
        assert_eq!(error.detail, "path not found");
    }

    #[actix_web::test]
    /// Any JSON number reaches the value check, so out-of-range integers give 400, not 422
    async fn test_feedback_value_beyond_i64() {
        let app = init_app!(&[]);
        let user_id = create_user!(app);
        let path_id = create_path!(app, user_id);

        for value in [json!(9223372036854775808u64), json!(2.5)] {
            let response = post_json!(
                app,
                "/feedback",
                json!({"userId": user_id, "pathId": path_id, "value": value})
            );
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{value}");
            let error: ErrorResponse = test::read_body_json(response).await;
            assert_eq!(error.detail, "value must be 1 or -1");
        }

        let response = post_json!(
            app,
            "/feedback",
            json!({"userId": user_id, "pathId": path_id, "value": 1.0})
        );
        assert_eq!(response.status(), StatusCode::OK);
        let _: FeedbackResponse = test::read_body_json(response).await;

        let response = post_json!(
            app,
            "/feedback",
            json!({"userId": user_id, "pathId": path_id, "value": "1"})
        );
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_liked_paths_limit_validation() {
        let app = init_app!(&[]);
        let user_id = create_user!(app);

        for query in [
            format!("user_id={user_id}&limit=0"),
            format!("user_id={user_id}&limit=11"),
            format!("user_id={user_id}&limit=two"),
            "limit=2".to_string(),
        ] {
            let response = test::call_service(
                &app,
                test::TestRequest::get()
                    .uri(&format!("/paths/liked?{query}"))
                    .to_request(),
            )
            .await;
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{query}");
        }

        let liked: LikedPathsResponse = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/paths/liked?user_id={user_id}&limit=10"))
                .to_request(),
        )
        .await;
        assert!(liked.paths.is_empty());
    }

    #[actix_web::test]
    async fn test_malformed_bodies_are_unprocessable() {
        let app = init_app!(&[]);
        let user_id = create_user!(app);

        let response = post_json!(app, "/paths", json!({"userId": user_id, "minutes": 30}));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = post_json!(
            app,
            "/paths",
            json!({"userId": user_id, "minutes": 30, "distanceM": 2000, "durationSec": 1500, "meta": [1, 2]})
        );
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = post_json!(
            app,
            "/routes/recommend",
            json!({"userId": "not-a-uuid", "minutes": 20, "start": {"lat": 0.0, "lng": 0.0}})
        );
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_cors_allow_list() {
        let allowed = vec!["http://localhost:3000".to_string()];
        let app = init_app!(&allowed);

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/health")
                .insert_header((ORIGIN, "http://localhost:3000"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
    }

    #[actix_web::test]
    async fn test_cors_any_origin() {
        let app = init_app!(&[]);

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/health")
                .insert_header((ORIGIN, "https://anywhere.example"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
