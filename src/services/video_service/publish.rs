use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use crate::services::media_host::{Transform, UploadRequest};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{NewVideo, VideoPatch, VideoResponse, VideoService};

pub const VIDEO_FOLDER: &str = "/videos";

impl VideoService {
    /// Uploads the media, derives a thumbnail and stores the video.
    ///
    /// If the row cannot be written the uploaded asset is deleted again, so
    /// either both exist or neither does.
    pub async fn publish(
        &self,
        owner: &users::Model,
        input: NewVideo,
    ) -> Result<VideoResponse, AppError> {
        let uploaded = self
            .media
            .upload(UploadRequest {
                source: input.source,
                folder: VIDEO_FOLDER.to_string(),
                file_name: input.file_name,
            })
            .await?;

        let thumbnail_url = self
            .media
            .derived_url(&uploaded.url, &Transform::thumbnail());

        let now = Utc::now();
        let video = videos::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(input.title),
            description: Set(input.description),
            video_url: Set(uploaded.url.clone()),
            thumbnail_url: Set(thumbnail_url),
            user_id: Set(owner.id.clone()),
            username: Set(owner.username.clone()),
            category: Set(input.category),
            hashtags: Set(serde_json::json!(input.hashtags)),
            is_private: Set(input.is_private),
            views: Set(0),
            shares: Set(0),
            media_file_id: Set(Some(uploaded.file_id.clone())),
            media_file_path: Set(Some(uploaded.file_path.clone())),
            duration: Set(input.duration),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let saved = match video.insert(&self.db).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!(
                    "⚠️ Video insert failed, removing uploaded media {}",
                    uploaded.file_id
                );
                if let Err(cleanup) = self.media.delete_file(&uploaded.file_id).await {
                    error!(
                        "❌ Failed to remove orphaned media {}: {}",
                        uploaded.file_id, cleanup
                    );
                }
                return Err(e.into());
            }
        };

        info!("🎬 Video {} published by {}", saved.id, owner.username);

        self.hydrate(vec![saved])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("published video vanished".to_string()))
    }

    pub async fn update(
        &self,
        video_id: &str,
        actor_id: &str,
        patch: VideoPatch,
    ) -> Result<VideoResponse, AppError> {
        let video = self.find(video_id).await?;
        if !video.is_owned_by(actor_id) {
            return Err(AppError::Unauthorized(
                "Not authorized to update this video".to_string(),
            ));
        }

        let mut active: videos::ActiveModel = video.into();
        if let Some(title) = patch.title {
            active.title = Set(title);
        }
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(hashtags) = patch.hashtags {
            active.hashtags = Set(serde_json::json!(hashtags));
        }
        if let Some(is_private) = patch.is_private {
            active.is_private = Set(is_private);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await?;

        self.hydrate(vec![updated])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Deletes the hosted media first, then the video with its likes and comments.
    pub async fn delete(&self, video_id: &str, actor_id: &str) -> Result<(), AppError> {
        let video = self.find(video_id).await?;
        if !video.is_owned_by(actor_id) {
            return Err(AppError::Unauthorized(
                "Not authorized to delete this video".to_string(),
            ));
        }

        if let Some(file_id) = video.media_file_id.as_deref() {
            self.media.delete_file(file_id).await?;
        }

        let txn = self.db.begin().await?;

        VideoLikes::delete_many()
            .filter(video_likes::Column::VideoId.eq(video_id))
            .exec(&txn)
            .await?;
        VideoComments::delete_many()
            .filter(video_comments::Column::VideoId.eq(video_id))
            .exec(&txn)
            .await?;
        Videos::delete_by_id(video_id).exec(&txn).await?;

        txn.commit().await?;

        info!("🗑️  Video {} deleted by {}", video_id, actor_id);
        Ok(())
    }
}
