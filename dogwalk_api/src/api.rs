use std::fmt;

use chrono::{DateTime, Utc};
use paperclip::actix::Apiv2Schema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new_random() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl paperclip::v2::schema::Apiv2Schema for $name {}
    };
}

uuid_id!(
    /// Identifier of a user, generated on creation
    UserId
);
uuid_id!(
    /// Identifier of a logged walk path
    PathId
);
uuid_id!(
    /// Identifier of a single like/dislike event
    FeedbackId
);

/// Free-form key-value document attached to a path, stored as a JSON object
#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct PathMeta(pub serde_json::Map<String, serde_json::Value>);

impl paperclip::v2::schema::Apiv2Schema for PathMeta {}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct HealthResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// A walk logged by the user
pub struct CreatePathRequest {
    pub user_id: UserId,
    pub minutes: i32,
    pub distance_m: i32,
    pub duration_sec: i32,
    /// Defaults to an empty document when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PathMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatePathResponse {
    pub path_id: PathId,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Query of GET /paths/liked
pub struct LikedPathsQuery {
    pub user_id: UserId,
    /// Between 1 and 10, 2 when omitted
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
/// Stored path record
pub struct Path {
    pub id: PathId,
    pub user_id: UserId,
    pub minutes: i32,
    pub distance_m: i32,
    pub duration_sec: i32,
    pub meta: PathMeta,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LikedPathsResponse {
    pub paths: Vec<Path>,
}

/// Feedback value as sent by the client, any JSON number is accepted here
/// and anything other than 1 or -1 is rejected by the feedback service
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct FeedbackScore(pub serde_json::Number);

impl From<i64> for FeedbackScore {
    fn from(value: i64) -> Self {
        Self(value.into())
    }
}

impl paperclip::v2::schema::Apiv2Schema for FeedbackScore {}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
/// Like (1) or dislike (-1) of a path by a user
pub struct FeedbackRequest {
    pub user_id: UserId,
    pub path_id: PathId,
    pub value: FeedbackScore,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub feedback_id: FeedbackId,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Apiv2Schema)]
pub struct StartPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Apiv2Schema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub user_id: UserId,
    pub minutes: i32,
    pub start: StartPoint,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
/// Where a recommended route came from
pub enum RouteSource {
    Liked,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedRoute {
    pub source: RouteSource,
    pub path_id: PathId,
    /// Owner of the path, which differs from the requesting user when
    /// the liked path was logged by someone else
    pub user_id: UserId,
    pub minutes: i32,
    pub distance_m: i32,
    pub duration_sec: i32,
    pub meta: PathMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct RecommendResponse {
    pub routes: Vec<RecommendedRoute>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
