pub use in_memory_walk_repository::InMemoryWalkRepository;
pub use postgres_walk_repository::{PostgresWalkRepository, PostgresWalkRepositoryConfig};

use crate::api::{FeedbackId, Path, PathId, PathMeta, UserId};

mod in_memory_walk_repository;
mod postgres_walk_repository;

#[derive(Debug, thiserror::Error)]
pub enum WalkRepositoryError {
    #[error("User {0} not found")]
    UserNotFound(UserId),

    #[error("Path {0} not found")]
    PathNotFound(PathId),

    #[error("Failed to deserialize path meta: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Database failure {0}")]
    DatabaseFailure(#[from] tokio_postgres::Error),

    #[error("Connection pool failure {0}")]
    PoolFailure(#[from] bb8::RunError<tokio_postgres::Error>),

    #[error("Other error {0}")]
    Other(String),
}

/// Like or dislike, the only values a feedback row may carry
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FeedbackValue {
    Like,
    Dislike,
}

impl FeedbackValue {
    pub fn as_i16(self) -> i16 {
        match self {
            FeedbackValue::Like => 1,
            FeedbackValue::Dislike => -1,
        }
    }
}

/// Only exactly 1 and -1 convert, whether sent as integers or as 1.0 / -1.0
impl TryFrom<&serde_json::Number> for FeedbackValue {
    type Error = serde_json::Number;

    fn try_from(value: &serde_json::Number) -> Result<Self, Self::Error> {
        match value.as_f64() {
            Some(v) if v == 1.0 => Ok(FeedbackValue::Like),
            Some(v) if v == -1.0 => Ok(FeedbackValue::Dislike),
            _ => Err(value.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPath {
    pub user_id: UserId,
    pub minutes: i32,
    pub distance_m: i32,
    pub duration_sec: i32,
    pub meta: PathMeta,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewFeedback {
    pub user_id: UserId,
    pub path_id: PathId,
    pub value: FeedbackValue,
}

#[async_trait::async_trait]
pub trait WalkRepository: Send + Sync {
    /// Inserts a user with no attributes, returns the generated id
    async fn add_user(&self) -> Result<UserId, WalkRepositoryError>;

    async fn user_exists(&self, user_id: UserId) -> Result<bool, WalkRepositoryError>;

    /// Inserts a path owned by `path.user_id`
    /// Fails with UserNotFound if the owner does not exist
    async fn add_path(&self, path: NewPath) -> Result<PathId, WalkRepositoryError>;

    async fn path_exists(&self, path_id: PathId) -> Result<bool, WalkRepositoryError>;

    /// Stores a single feedback event, repeated feedback for the same pair accumulates
    /// Fails with UserNotFound, or PathNotFound when only the path is missing
    async fn add_feedback(&self, feedback: NewFeedback) -> Result<FeedbackId, WalkRepositoryError>;

    /// Paths liked by the user, most recent like first, at most `limit` of them
    async fn get_liked_paths(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Path>, WalkRepositoryError>;
}
