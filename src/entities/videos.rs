use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub video_url: String,
    pub thumbnail_url: String,
    pub user_id: String,
    pub username: String, // copied from the owner at upload time
    pub category: String,
    pub hashtags: Json, // ordered array of strings
    #[sea_orm(default_value = false)]
    pub is_private: bool,
    #[sea_orm(default_value = 0)]
    pub views: i64,
    #[sea_orm(default_value = 0)]
    pub shares: i64,
    pub media_file_id: Option<String>,
    pub media_file_path: Option<String>,
    pub duration: Option<f64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::video_likes::Entity")]
    VideoLikes,
    #[sea_orm(has_many = "super::video_comments::Entity")]
    VideoComments,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::video_likes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VideoLikes.def()
    }
}

impl Related<super::video_comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VideoComments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn hashtag_list(&self) -> Vec<String> {
        serde_json::from_value(self.hashtags.clone()).unwrap_or_default()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}
