use crate::api::UserId;
use crate::error::ServiceError;
use crate::walk_repository::WalkRepository;

/// Creates a user with no attributes
#[tracing::instrument(skip(repository))]
pub async fn create_user(repository: &dyn WalkRepository) -> Result<UserId, ServiceError> {
    let user_id = repository.add_user().await?;
    tracing::info!("Created user {}", user_id);
    Ok(user_id)
}
