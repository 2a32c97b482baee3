use crate::api::{CreatePathRequest, Path, PathId, UserId};
use crate::error::ServiceError;
use crate::walk_repository::{NewPath, WalkRepository};

pub const DEFAULT_LIKED_PATHS_LIMIT: i64 = 2;
pub const MAX_LIKED_PATHS_LIMIT: i64 = 10;

/// Logs a walk for an existing user, meta defaults to an empty document
///
/// Unknown owner is reported by the repository insert as UserNotFound.
#[tracing::instrument(skip(repository))]
pub async fn create_path(
    repository: &dyn WalkRepository,
    request: CreatePathRequest,
) -> Result<PathId, ServiceError> {
    let path_id = repository
        .add_path(NewPath {
            user_id: request.user_id,
            minutes: request.minutes,
            distance_m: request.distance_m,
            duration_sec: request.duration_sec,
            meta: request.meta.unwrap_or_default(),
        })
        .await?;
    tracing::info!("Created path {} for user {}", path_id, request.user_id);
    Ok(path_id)
}

/// Most recently liked paths of the user, `limit` must be within 1..=10
#[tracing::instrument(skip(repository))]
pub async fn get_liked_paths(
    repository: &dyn WalkRepository,
    user_id: UserId,
    limit: Option<i64>,
) -> Result<Vec<Path>, ServiceError> {
    let limit = limit.unwrap_or(DEFAULT_LIKED_PATHS_LIMIT);
    if !(1..=MAX_LIKED_PATHS_LIMIT).contains(&limit) {
        return Err(ServiceError::Unprocessable(format!(
            "limit must be between 1 and {MAX_LIKED_PATHS_LIMIT}"
        )));
    }

    Ok(repository.get_liked_paths(user_id, limit as usize).await?)
}
