use anyhow::{bail, Context};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;

use crate::api::{
    CreatePathRequest, CreatePathResponse, CreateUserResponse, ErrorResponse, FeedbackId,
    FeedbackRequest, FeedbackResponse, HealthResponse, LikedPathsResponse, Path, PathId,
    RecommendRequest, RecommendResponse, UserId,
};

pub struct DogWalkClient {
    url: String,
    client: ClientWithMiddleware,
}

async fn parse_response<T: DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> anyhow::Result<T> {
    let status = response.status();
    if status.is_success() {
        return response
            .json()
            .await
            .with_context(|| format!("Failed to parse response of {operation}"));
    }

    let detail = response
        .json::<ErrorResponse>()
        .await
        .map(|error| error.detail)
        .unwrap_or_default();
    bail!("Failed to {operation}: {status} {detail}")
}

impl DogWalkClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Calls GET /health endpoint
    pub async fn health(&self) -> anyhow::Result<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.url))
            .send()
            .await?;
        let health: HealthResponse = parse_response(response, "check health").await?;
        Ok(health.ok)
    }

    /// Calls POST /users endpoint
    /// Returns id of the created user
    pub async fn create_user(&self) -> anyhow::Result<UserId> {
        let response = self
            .client
            .post(format!("{}/users", self.url))
            .send()
            .await?;
        let created: CreateUserResponse = parse_response(response, "create user").await?;
        Ok(created.user_id)
    }

    /// Calls POST /paths endpoint
    pub async fn create_path(&self, request: &CreatePathRequest) -> anyhow::Result<PathId> {
        let response = self
            .client
            .post(format!("{}/paths", self.url))
            .json(request)
            .send()
            .await?;
        let created: CreatePathResponse = parse_response(response, "create path").await?;
        Ok(created.path_id)
    }

    /// Calls GET /paths/liked endpoint
    /// Server applies its default limit when `limit` is None
    pub async fn liked_paths(
        &self,
        user_id: UserId,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<Path>> {
        let mut url = format!("{}/paths/liked?user_id={}", self.url, user_id);
        if let Some(limit) = limit {
            url.push_str(&format!("&limit={limit}"));
        }
        let response = self.client.get(url).send().await?;
        let liked: LikedPathsResponse = parse_response(response, "get liked paths").await?;
        Ok(liked.paths)
    }

    /// Calls POST /feedback endpoint
    pub async fn submit_feedback(&self, request: &FeedbackRequest) -> anyhow::Result<FeedbackId> {
        let response = self
            .client
            .post(format!("{}/feedback", self.url))
            .json(request)
            .send()
            .await?;
        let created: FeedbackResponse = parse_response(response, "submit feedback").await?;
        Ok(created.feedback_id)
    }

    /// Calls POST /routes/recommend endpoint
    pub async fn recommend(&self, request: &RecommendRequest) -> anyhow::Result<RecommendResponse> {
        let response = self
            .client
            .post(format!("{}/routes/recommend", self.url))
            .json(request)
            .send()
            .await?;
        parse_response(response, "recommend routes").await
    }
}
