use crate::api::{FeedbackId, FeedbackRequest};
use crate::error::ServiceError;
use crate::walk_repository::{FeedbackValue, NewFeedback, WalkRepository};

pub const INVALID_VALUE: &str = "value must be 1 or -1";

/// Records a like or dislike
///
/// Checks run in a fixed order and stop at the first failure:
/// value here, then user and path inside the repository insert.
#[tracing::instrument(skip(repository))]
pub async fn create_feedback(
    repository: &dyn WalkRepository,
    request: FeedbackRequest,
) -> Result<FeedbackId, ServiceError> {
    let value = FeedbackValue::try_from(&request.value.0)
        .map_err(|_| ServiceError::InvalidArgument(INVALID_VALUE.into()))?;

    let feedback_id = repository
        .add_feedback(NewFeedback {
            user_id: request.user_id,
            path_id: request.path_id,
            value,
        })
        .await?;
    tracing::info!(
        "Stored feedback {} ({:?}) of user {} for path {}",
        feedback_id,
        value,
        request.user_id,
        request.path_id
    );
    Ok(feedback_id)
}
