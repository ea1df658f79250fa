//! GitHub Projects (v2) status updates integration.
//!
//! Reads a project's status-update history through the GitHub GraphQL API
//! and posts new status updates back to the project.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::{GitHubConfig, OwnerKind, ProjectConfig, Secret};

/// Paged query for a project's status updates, newest first.
///
/// `OWNER_FIELD` is replaced with `user` or `organization`; the root field
/// is aliased to `owner` so both shapes deserialize the same way.
const UPDATES_QUERY_TEMPLATE: &str = r#"
    query StatusUpdates($login: String!, $number: Int!, $first: Int!, $cursor: String) {
        owner: OWNER_FIELD(login: $login) {
            projectV2(number: $number) {
                id
                statusUpdates(
                    first: $first
                    orderBy: {field: CREATED_AT, direction: DESC}
                    after: $cursor
                ) {
                    pageInfo {
                        hasNextPage
                        endCursor
                    }
                    nodes {
                        id
                        body
                        status
                        createdAt
                        creator {
                            login
                        }
                        startDate
                        targetDate
                    }
                }
            }
        }
    }
"#;

const CREATE_STATUS_UPDATE_MUTATION: &str = r#"
    mutation CreateStatusUpdate(
        $projectId: ID!
        $body: String!
        $status: ProjectV2StatusUpdateStatus!
    ) {
        createProjectV2StatusUpdate(input: {projectId: $projectId, body: $body, status: $status}) {
            statusUpdate {
                id
                createdAt
            }
        }
    }
"#;

/// Trajectory label attached to a status update.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusUpdateStatus {
    #[value(alias = "ON_TRACK")]
    OnTrack,
    #[value(alias = "AT_RISK")]
    AtRisk,
    #[value(alias = "OFF_TRACK")]
    OffTrack,
    #[value(alias = "INACTIVE")]
    Inactive,
    #[value(alias = "COMPLETE")]
    Complete,
}

impl StatusUpdateStatus {
    /// The GraphQL enum name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnTrack => "ON_TRACK",
            Self::AtRisk => "AT_RISK",
            Self::OffTrack => "OFF_TRACK",
            Self::Inactive => "INACTIVE",
            Self::Complete => "COMPLETE",
        }
    }
}

impl std::fmt::Display for StatusUpdateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The author of a status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User login
    pub login: String,
}

/// A status update posted to a project.
///
/// Field names follow the GraphQL response so the record serializes back
/// to the shape GitHub returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    /// Node ID
    pub id: String,
    /// Body text (markdown)
    #[serde(default)]
    pub body: Option<String>,
    /// Trajectory label
    #[serde(default)]
    pub status: Option<StatusUpdateStatus>,
    /// Created timestamp (ISO-8601)
    #[serde(default)]
    pub created_at: String,
    /// Author
    #[serde(default)]
    pub creator: Option<Actor>,
    /// Start date if set
    #[serde(default)]
    pub start_date: Option<String>,
    /// Target date if set
    #[serde(default)]
    pub target_date: Option<String>,
}

impl StatusUpdate {
    /// Status label, `INACTIVE` when unset.
    pub fn status_label(&self) -> &'static str {
        self.status.unwrap_or(StatusUpdateStatus::Inactive).as_str()
    }

    /// Author login, `unknown` when unset.
    pub fn creator_login(&self) -> &str {
        self.creator.as_ref().map_or("unknown", |c| c.login.as_str())
    }

    /// Date portion of the creation timestamp.
    pub fn created_date(&self) -> &str {
        match self.created_at.char_indices().nth(10) {
            Some((end, _)) => &self.created_at[..end],
            None => &self.created_at,
        }
    }

    /// Trimmed body text.
    pub fn trimmed_body(&self) -> &str {
        self.body.as_deref().map_or("", str::trim)
    }

    /// `start → target` when either date is set, with `?` for the missing end.
    pub fn schedule(&self) -> Option<String> {
        if self.start_date.is_none() && self.target_date.is_none() {
            return None;
        }
        Some(format!(
            "{} → {}",
            self.start_date.as_deref().unwrap_or("?"),
            self.target_date.as_deref().unwrap_or("?")
        ))
    }
}

/// A project's status-update history.
#[derive(Debug, Clone)]
pub struct StatusHistory {
    /// Project node ID as returned by the query
    pub project_id: String,
    /// Status updates, oldest first
    pub updates: Vec<StatusUpdate>,
}

/// A newly created status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostedStatusUpdate {
    /// Node ID
    pub id: String,
    /// Created timestamp
    pub created_at: String,
}

/// Result type for GitHub Projects operations.
pub type ProjectsResult<T> = Result<T, ProjectsError>;

/// Error types for GitHub Projects operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error: {message} (status: {status})")]
    Api { status: u16, message: String },

    #[error("Authentication required")]
    Unauthorized,

    #[error("GraphQL error: {0}")]
    GraphQL(String),

    #[error("Missing data in response: {0}")]
    MissingData(String),

    #[error("Stopped after {0} pages; raise github.max_pages to fetch more")]
    PageLimitExceeded(u32),
}

/// Read and write access to a project's status updates.
#[async_trait]
pub trait StatusUpdateStore: Send + Sync {
    /// Fetch every status update, oldest first.
    async fn fetch_status_updates(&self) -> ProjectsResult<StatusHistory>;

    /// Create a status update on the project.
    async fn post_status_update(
        &self,
        project_id: &str,
        body: &str,
        status: StatusUpdateStatus,
    ) -> ProjectsResult<PostedStatusUpdate>;
}

/// GitHub Projects GraphQL client.
#[derive(Debug, Clone)]
pub struct GitHubProjects {
    /// GitHub API token
    token: Secret,
    /// GraphQL endpoint
    endpoint: String,
    /// Project coordinates
    owner: String,
    owner_kind: OwnerKind,
    number: u32,
    /// Pagination settings
    page_size: u32,
    max_pages: u32,
    /// HTTP client
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatesVariables<'a> {
    login: &'a str,
    number: u32,
    first: u32,
    cursor: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct UpdatesData {
    owner: Option<OwnerNode>,
}

#[derive(Debug, Deserialize)]
struct OwnerNode {
    #[serde(rename = "projectV2")]
    project: Option<ProjectNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectNode {
    id: String,
    status_updates: StatusUpdateConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusUpdateConnection {
    page_info: PageInfo,
    nodes: Vec<StatusUpdate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

impl GitHubProjects {
    /// Create a new client for the configured project.
    pub fn new(
        token: Secret,
        github: &GitHubConfig,
        project: &ProjectConfig,
    ) -> ProjectsResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = github.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            token,
            endpoint: format!("{}/graphql", github.api_url.trim_end_matches('/')),
            owner: project.owner.clone(),
            owner_kind: project.owner_kind,
            number: project.number,
            page_size: github.effective_page_size(),
            max_pages: github.max_pages,
            client: builder.build()?,
        })
    }

    /// The status-updates query for this project's owner type.
    fn updates_query(&self) -> String {
        UPDATES_QUERY_TEMPLATE.replace("OWNER_FIELD", self.owner_kind.graphql_field())
    }

    /// Execute a GraphQL request and decode its `data` member.
    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> ProjectsResult<T> {
        let body = serde_json::json!({ "query": query, "variables": variables });

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.token.expose()))
            .header("Accept", "application/json")
            .header("User-Agent", "status-digest")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProjectsError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(ProjectsError::Api { status: status.as_u16(), message });
        }

        let result: serde_json::Value = response.json().await?;

        // Check for GraphQL errors
        let first_error =
            result.get("errors").and_then(|e| e.as_array()).and_then(|e| e.first());
        if let Some(first_error) = first_error {
            let message =
                first_error.get("message").and_then(|m| m.as_str()).unwrap_or("Unknown error");
            return Err(ProjectsError::GraphQL(message.to_string()));
        }

        let data = result
            .get("data")
            .filter(|d| !d.is_null())
            .ok_or_else(|| ProjectsError::MissingData("data".to_string()))?;

        serde_json::from_value(data.clone())
            .map_err(|e| ProjectsError::GraphQL(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl StatusUpdateStore for GitHubProjects {
    async fn fetch_status_updates(&self) -> ProjectsResult<StatusHistory> {
        let query = self.updates_query();
        let mut updates = Vec::new();
        let mut project_id = None;
        let mut cursor: Option<String> = None;
        let mut pages = 0u32;

        loop {
            if self.max_pages > 0 && pages >= self.max_pages {
                return Err(ProjectsError::PageLimitExceeded(self.max_pages));
            }

            let variables = serde_json::to_value(UpdatesVariables {
                login: &self.owner,
                number: self.number,
                first: self.page_size,
                cursor: cursor.as_deref(),
            })
            .map_err(|e| ProjectsError::GraphQL(format!("Failed to encode variables: {}", e)))?;

            let data: UpdatesData = self.query(&query, variables).await?;
            pages += 1;

            let project = data
                .owner
                .ok_or_else(|| ProjectsError::MissingData(format!("owner '{}'", self.owner)))?
                .project
                .ok_or_else(|| {
                    ProjectsError::MissingData(format!(
                        "project #{} of '{}'",
                        self.number, self.owner
                    ))
                })?;

            let connection = project.status_updates;
            tracing::debug!(
                page = pages,
                records = connection.nodes.len(),
                has_next_page = connection.page_info.has_next_page,
                "Fetched status update page"
            );

            project_id.get_or_insert(project.id);
            updates.extend(connection.nodes);

            if !connection.page_info.has_next_page {
                break;
            }

            cursor = Some(connection.page_info.end_cursor.ok_or_else(|| {
                ProjectsError::MissingData("pageInfo.endCursor".to_string())
            })?);
        }

        // Pages arrive newest first
        updates.reverse();

        let project_id = project_id.unwrap_or_default();
        Ok(StatusHistory { project_id, updates })
    }

    async fn post_status_update(
        &self,
        project_id: &str,
        body: &str,
        status: StatusUpdateStatus,
    ) -> ProjectsResult<PostedStatusUpdate> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload {
            status_update: Option<PostedStatusUpdate>,
        }

        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Response {
            create_project_v2_status_update: Option<Payload>,
        }

        let variables = serde_json::json!({
            "projectId": project_id,
            "body": body,
            "status": status,
        });

        let response: Response = self.query(CREATE_STATUS_UPDATE_MUTATION, variables).await?;
        let posted = response
            .create_project_v2_status_update
            .and_then(|p| p.status_update)
            .ok_or_else(|| {
                ProjectsError::MissingData("createProjectV2StatusUpdate.statusUpdate".to_string())
            })?;

        tracing::info!(id = %posted.id, status = %status, "Posted status update");
        Ok(posted)
    }
}
