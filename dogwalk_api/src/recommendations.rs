use crate::api::{Path, RecommendRequest, RecommendResponse, RecommendedRoute, RouteSource};
use crate::error::ServiceError;
use crate::walk_repository::WalkRepository;

const NO_OF_RECOMMENDATIONS: usize = 3;
const NO_OF_LIKED_PATHS_CONSIDERED: usize = 2;
pub const NO_LIKED_ROUTES_NOTE: &str = "No liked routes yet.";

/// Recommends routes built from the paths the user liked most recently
///
/// `minutes` and `start` are only recorded on the span, they do not
/// influence which routes are returned.
#[tracing::instrument(skip(repository))]
pub async fn recommend(
    repository: &dyn WalkRepository,
    request: RecommendRequest,
) -> Result<RecommendResponse, ServiceError> {
    let liked = repository
        .get_liked_paths(request.user_id, NO_OF_LIKED_PATHS_CONSIDERED)
        .await?;

    if liked.is_empty() {
        return Ok(RecommendResponse {
            routes: vec![],
            note: Some(NO_LIKED_ROUTES_NOTE.to_string()),
        });
    }

    Ok(RecommendResponse {
        routes: pad_routes(liked.into_iter().map(liked_route).collect()),
        note: None,
    })
}

fn liked_route(path: Path) -> RecommendedRoute {
    RecommendedRoute {
        source: RouteSource::Liked,
        path_id: path.id,
        user_id: path.user_id,
        minutes: path.minutes,
        distance_m: path.distance_m,
        duration_sec: path.duration_sec,
        meta: path.meta,
    }
}

/// Repeats the last route until there are exactly NO_OF_RECOMMENDATIONS of them
fn pad_routes(mut routes: Vec<RecommendedRoute>) -> Vec<RecommendedRoute> {
    while let Some(last) = routes.last().cloned() {
        if routes.len() >= NO_OF_RECOMMENDATIONS {
            break;
        }
        routes.push(last);
    }
    routes.truncate(NO_OF_RECOMMENDATIONS);
    routes
}
