use serde::{Deserialize, Serialize};

/// Payload of `POST /api/rounds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoundRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub layout_name: Option<String>,
}

/// Query string of `GET /api/rounds`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundsQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}
