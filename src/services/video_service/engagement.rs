use crate::api::error::AppError;
use crate::entities::{prelude::*, *};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::{Expr, OnConflict},
};
use tracing::debug;
use uuid::Uuid;

use super::{CommentResponse, LikeToggle, ShareCount, VideoService};

impl VideoService {
    /// Counts one view. Every call counts; there is no per-viewer dedup.
    pub async fn record_view(&self, video_id: &str) -> Result<(), AppError> {
        let result = Videos::update_many()
            .col_expr(videos::Column::Views, Expr::col(videos::Column::Views).add(1))
            .filter(videos::Column::Id.eq(video_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Video not found".to_string()));
        }
        Ok(())
    }

    pub async fn record_share(&self, video_id: &str) -> Result<ShareCount, AppError> {
        let result = Videos::update_many()
            .col_expr(videos::Column::Shares, Expr::col(videos::Column::Shares).add(1))
            .filter(videos::Column::Id.eq(video_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        let video = self.find(video_id).await?;
        Ok(ShareCount {
            shares: video.shares,
        })
    }

    /// Removes the actor's like if present, adds it otherwise.
    ///
    /// Both branches are single statements keyed on (video, user), so
    /// concurrent toggles cannot produce duplicate likes or lose other
    /// users' likes.
    pub async fn toggle_like(&self, video_id: &str, user_id: &str) -> Result<LikeToggle, AppError> {
        self.find(video_id).await?;

        let removed = VideoLikes::delete_many()
            .filter(video_likes::Column::VideoId.eq(video_id))
            .filter(video_likes::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        let liked = if removed.rows_affected == 0 {
            let like = video_likes::ActiveModel {
                video_id: Set(video_id.to_string()),
                user_id: Set(user_id.to_string()),
                created_at: Set(Utc::now()),
            };
            VideoLikes::insert(like)
                .on_conflict(
                    OnConflict::columns([
                        video_likes::Column::VideoId,
                        video_likes::Column::UserId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?;
            true
        } else {
            false
        };

        let likes = VideoLikes::find()
            .filter(video_likes::Column::VideoId.eq(video_id))
            .count(&self.db)
            .await?;

        debug!("Like toggled on {} by {}: liked={}", video_id, user_id, liked);
        Ok(LikeToggle { liked, likes })
    }

    pub async fn comments(&self, video_id: &str) -> Result<Vec<CommentResponse>, AppError> {
        Ok(VideoComments::find()
            .filter(video_comments::Column::VideoId.eq(video_id))
            .order_by_desc(video_comments::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(CommentResponse::from)
            .collect())
    }

    /// Adds a comment and returns the video's comments, newest first.
    pub async fn add_comment(
        &self,
        video_id: &str,
        author: &users::Model,
        text: &str,
    ) -> Result<Vec<CommentResponse>, AppError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::BadRequest("Please add some text".to_string()));
        }

        self.find(video_id).await?;

        video_comments::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            video_id: Set(video_id.to_string()),
            user_id: Set(author.id.clone()),
            username: Set(author.username.clone()),
            text: Set(text.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        self.comments(video_id).await
    }

    /// Deletes a comment when the actor wrote it or owns the video.
    pub async fn delete_comment(
        &self,
        video_id: &str,
        comment_id: &str,
        actor_id: &str,
    ) -> Result<Vec<CommentResponse>, AppError> {
        let video = self.find(video_id).await?;

        let comment = VideoComments::find_by_id(comment_id)
            .filter(video_comments::Column::VideoId.eq(video_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        if comment.user_id != actor_id && !video.is_owned_by(actor_id) {
            return Err(AppError::Unauthorized(
                "Not authorized to delete this comment".to_string(),
            ));
        }

        VideoComments::delete_by_id(comment.id).exec(&self.db).await?;

        self.comments(video_id).await
    }
}
