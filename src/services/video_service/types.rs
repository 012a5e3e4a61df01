use crate::entities::{users, video_comments, videos};
use crate::services::media_host::MediaSource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public face of a user embedded in other payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub avatar_initial: String,
}

impl From<&users::Model> for UserSummary {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
            avatar_initial: user.avatar_initial.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    /// Author id
    pub user: String,
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<video_comments::Model> for CommentResponse {
    fn from(c: video_comments::Model) -> Self {
        Self {
            id: c.id,
            user: c.user_id,
            username: c.username,
            text: c.text,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: String,
    pub user: UserSummary,
    pub username: String,
    pub category: String,
    pub hashtags: Vec<String>,
    pub is_private: bool,
    pub views: i64,
    pub shares: i64,
    /// Ids of users who liked the video, newest first
    pub likes: Vec<String>,
    pub likes_count: u64,
    pub comments: Vec<CommentResponse>,
    pub duration: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoResponse {
    pub fn assemble(
        video: videos::Model,
        owner: Option<&users::Model>,
        likes: Vec<String>,
        comments: Vec<CommentResponse>,
    ) -> Self {
        let hashtags = video.hashtag_list();
        // Owner rows cascade with their videos; the fallback only covers
        // rows written outside the API.
        let user = owner.map(UserSummary::from).unwrap_or_else(|| UserSummary {
            id: video.user_id.clone(),
            username: video.username.clone(),
            display_name: video.username.trim_start_matches('@').to_string(),
            avatar_url: None,
            avatar_initial: String::new(),
        });

        Self {
            id: video.id,
            title: video.title,
            description: video.description,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            user,
            username: video.username,
            category: video.category,
            hashtags,
            is_private: video.is_private,
            views: video.views,
            shares: video.shares,
            likes_count: likes.len() as u64,
            likes,
            comments,
            duration: video.duration,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LikeToggle {
    pub liked: bool,
    pub likes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShareCount {
    pub shares: i64,
}

/// Validated input for publishing a video.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub hashtags: Vec<String>,
    pub is_private: bool,
    pub duration: Option<f64>,
    pub source: MediaSource,
    pub file_name: String,
}

/// Fields an owner may change after publishing.
#[derive(Debug, Clone, Default)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub hashtags: Option<Vec<String>>,
    pub is_private: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(user_id: &str, username: &str) -> videos::Model {
        let now = Utc::now();
        videos::Model {
            id: "v1".to_string(),
            title: "Sunset".to_string(),
            description: None,
            video_url: "https://media.test/videos/v1.mp4".to_string(),
            thumbnail_url: "https://media.test/videos/v1.mp4?tr=w-400".to_string(),
            user_id: user_id.to_string(),
            username: username.to_string(),
            category: "travel".to_string(),
            hashtags: serde_json::json!(["beach", "summer"]),
            is_private: false,
            views: 3,
            shares: 1,
            media_file_id: Some("file_1".to_string()),
            media_file_path: None,
            duration: Some(12.5),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_assemble_counts_likes_and_keeps_hashtag_order() {
        let response = VideoResponse::assemble(
            video("u1", "@alice"),
            None,
            vec!["u2".to_string(), "u3".to_string()],
            Vec::new(),
        );

        assert_eq!(response.likes_count, 2);
        assert_eq!(response.hashtags, vec!["beach", "summer"]);
        assert_eq!(response.views, 3);
    }

    #[test]
    fn test_assemble_without_owner_row_falls_back_to_stored_username() {
        let response = VideoResponse::assemble(video("u9", "@ghost"), None, Vec::new(), Vec::new());

        assert_eq!(response.user.id, "u9");
        assert_eq!(response.user.username, "@ghost");
        assert_eq!(response.user.display_name, "ghost");
        assert!(response.user.avatar_url.is_none());
    }
}
