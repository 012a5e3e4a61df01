use crate::api::error::AppError;
use crate::api::response::PageQuery;
use crate::entities::{prelude::*, *};
use chrono::{Duration, Utc};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    sea_query::{Expr, Func, Order, SimpleExpr},
};
use std::collections::HashMap;

use super::{CommentResponse, VideoResponse, VideoService};

/// Window a video counts as "trending" in.
pub const TRENDING_WINDOW_DAYS: i64 = 7;

impl VideoService {
    pub async fn find(&self, id: &str) -> Result<videos::Model, AppError> {
        Videos::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Attaches owners, likes and comments to a batch of videos, keeping order.
    pub async fn hydrate(&self, list: Vec<videos::Model>) -> Result<Vec<VideoResponse>, AppError> {
        if list.is_empty() {
            return Ok(Vec::new());
        }

        let video_ids: Vec<String> = list.iter().map(|v| v.id.clone()).collect();
        let owner_ids: Vec<String> = list.iter().map(|v| v.user_id.clone()).collect();

        let owners: HashMap<String, users::Model> = Users::find()
            .filter(users::Column::Id.is_in(owner_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();

        let mut likes: HashMap<String, Vec<String>> = HashMap::new();
        for like in VideoLikes::find()
            .filter(video_likes::Column::VideoId.is_in(video_ids.clone()))
            .order_by_desc(video_likes::Column::CreatedAt)
            .all(&self.db)
            .await?
        {
            likes.entry(like.video_id).or_default().push(like.user_id);
        }

        let mut comments: HashMap<String, Vec<CommentResponse>> = HashMap::new();
        for comment in VideoComments::find()
            .filter(video_comments::Column::VideoId.is_in(video_ids))
            .order_by_desc(video_comments::Column::CreatedAt)
            .all(&self.db)
            .await?
        {
            comments
                .entry(comment.video_id.clone())
                .or_default()
                .push(comment.into());
        }

        Ok(list
            .into_iter()
            .map(|video| {
                let owner = owners.get(&video.user_id);
                let video_likes = likes.remove(&video.id).unwrap_or_default();
                let video_comments = comments.remove(&video.id).unwrap_or_default();
                VideoResponse::assemble(video, owner, video_likes, video_comments)
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<VideoResponse, AppError> {
        let video = self.find(id).await?;
        self.hydrate(vec![video])
            .await?
            .pop()
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    /// Newest-first page of public videos, optionally within one category.
    /// Returns the page and the total number of matching videos.
    pub async fn list_public(
        &self,
        page: &PageQuery,
        category: Option<&str>,
    ) -> Result<(Vec<VideoResponse>, u64), AppError> {
        let mut cond = Condition::all().add(videos::Column::IsPrivate.eq(false));
        if let Some(category) = category {
            cond = cond.add(videos::Column::Category.eq(category));
        }

        let total = Videos::find().filter(cond.clone()).count(&self.db).await?;

        let rows = Videos::find()
            .filter(cond)
            .order_by_desc(videos::Column::CreatedAt)
            .order_by_desc(videos::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((self.hydrate(rows).await?, total))
    }

    /// Public videos from the last week by views, ties broken by like count.
    pub async fn trending(&self, limit: u64) -> Result<Vec<VideoResponse>, AppError> {
        let since = Utc::now() - Duration::days(TRENDING_WINDOW_DAYS);
        let like_count: SimpleExpr = Func::count(Expr::col((
            video_likes::Entity,
            video_likes::Column::UserId,
        )))
        .into();

        let rows = Videos::find()
            .filter(videos::Column::CreatedAt.gte(since))
            .filter(videos::Column::IsPrivate.eq(false))
            .left_join(VideoLikes)
            .group_by(videos::Column::Id)
            .order_by_desc(videos::Column::Views)
            .order_by(like_count, Order::Desc)
            .order_by_desc(videos::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;

        self.hydrate(rows).await
    }

    pub async fn by_user(&self, user_id: &str) -> Result<Vec<VideoResponse>, AppError> {
        let rows = Videos::find()
            .filter(videos::Column::UserId.eq(user_id))
            .filter(videos::Column::IsPrivate.eq(false))
            .order_by_desc(videos::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.hydrate(rows).await
    }

    /// Public videos the user liked, most recently liked first.
    pub async fn liked_by(&self, user_id: &str) -> Result<Vec<VideoResponse>, AppError> {
        let rows = Videos::find()
            .inner_join(VideoLikes)
            .filter(video_likes::Column::UserId.eq(user_id))
            .filter(videos::Column::IsPrivate.eq(false))
            .order_by_desc(video_likes::Column::CreatedAt)
            .all(&self.db)
            .await?;

        self.hydrate(rows).await
    }
}
