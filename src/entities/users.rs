use crate::utils::auth::create_jwt;
use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::ActiveValue;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    pub display_name: String,
    #[sea_orm(unique)]
    pub email: String,
    /// argon2 PHC string
    #[serde(skip_serializing)]
    pub password: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar_initial: String,
    #[sea_orm(default_value = 0)]
    pub followers: i64,
    #[sea_orm(default_value = 0)]
    pub following: i64,
    #[sea_orm(default_value = false)]
    pub is_pro: bool,
    pub category: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::videos::Entity")]
    Videos,
    #[sea_orm(has_many = "super::video_likes::Entity")]
    VideoLikes,
    #[sea_orm(has_many = "super::video_comments::Entity")]
    VideoComments,
}

impl Related<super::videos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videos.def()
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

pub fn hash_password(plain: &str) -> Result<String, DbErr> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| DbErr::Custom(format!("password hashing failed: {e}")))
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Hashes every password that was `Set` on this model. Values loaded
    /// from the store are `Unchanged` and pass through.
    async fn before_save<C>(mut self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if let ActiveValue::Set(ref password) = self.password {
            let hashed = hash_password(password)?;
            self.password = ActiveValue::Set(hashed);
        }
        Ok(self)
    }
}

impl Model {
    /// Compares a plaintext candidate against the stored hash.
    pub fn verify_password(&self, candidate: &str) -> bool {
        match PasswordHash::new(&self.password) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Signed identity token embedding this user's id.
    pub fn issue_token(&self, secret: &str, ttl: chrono::Duration) -> anyhow::Result<String> {
        create_jwt(&self.id, secret, ttl)
    }
}
