use std::collections::{HashMap, HashSet};

use chrono::Utc;

use crate::api::{FeedbackId, Path, PathId, UserId};
use crate::walk_repository::{
    FeedbackValue, NewFeedback, NewPath, WalkRepository, WalkRepositoryError,
};

struct FeedbackRecord {
    user_id: UserId,
    path_id: PathId,
    value: FeedbackValue,
}

/// Keeps every table in process memory, feedback in insertion order
#[derive(Default)]
pub struct InMemoryWalkRepository {
    users: parking_lot::RwLock<HashSet<UserId>>,
    paths: parking_lot::RwLock<HashMap<PathId, Path>>,
    feedback: parking_lot::RwLock<Vec<(FeedbackId, FeedbackRecord)>>,
}

impl InMemoryWalkRepository {
    #[cfg(test)]
    pub(crate) fn path_count(&self) -> usize {
        self.paths.read().len()
    }
}

#[async_trait::async_trait]
impl WalkRepository for InMemoryWalkRepository {
    async fn add_user(&self) -> Result<UserId, WalkRepositoryError> {
        let id = UserId::new_random();
        self.users.write().insert(id);
        Ok(id)
    }

    async fn user_exists(&self, user_id: UserId) -> Result<bool, WalkRepositoryError> {
        Ok(self.users.read().contains(&user_id))
    }

    async fn add_path(&self, path: NewPath) -> Result<PathId, WalkRepositoryError> {
        if !self.users.read().contains(&path.user_id) {
            return Err(WalkRepositoryError::UserNotFound(path.user_id));
        }

        let id = PathId::new_random();
        self.paths.write().insert(
            id,
            Path {
                id,
                user_id: path.user_id,
                minutes: path.minutes,
                distance_m: path.distance_m,
                duration_sec: path.duration_sec,
                meta: path.meta,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn path_exists(&self, path_id: PathId) -> Result<bool, WalkRepositoryError> {
        Ok(self.paths.read().contains_key(&path_id))
    }

    async fn add_feedback(&self, feedback: NewFeedback) -> Result<FeedbackId, WalkRepositoryError> {
        if !self.users.read().contains(&feedback.user_id) {
            return Err(WalkRepositoryError::UserNotFound(feedback.user_id));
        }
        if !self.paths.read().contains_key(&feedback.path_id) {
            return Err(WalkRepositoryError::PathNotFound(feedback.path_id));
        }

        let id = FeedbackId::new_random();
        self.feedback.write().push((
            id,
            FeedbackRecord {
                user_id: feedback.user_id,
                path_id: feedback.path_id,
                value: feedback.value,
            },
        ));
        Ok(id)
    }

    async fn get_liked_paths(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Path>, WalkRepositoryError> {
        let paths = self.paths.read();
        Ok(self
            .feedback
            .read()
            .iter()
            .rev()
            .map(|(_, record)| record)
            .filter(|record| record.user_id == user_id && record.value == FeedbackValue::Like)
            .filter_map(|record| paths.get(&record.path_id).cloned())
            .take(limit)
            .collect())
    }
}
