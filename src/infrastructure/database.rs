use crate::entities::{categories, users, video_comments, video_likes, videos};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema,
    sea_query::{Index, IndexCreateStatement},
};
use std::env;
use std::time::Duration;
use tracing::{info, warn};

pub async fn setup_database() -> anyhow::Result<DatabaseConnection> {
    let db_url = env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

    info!("📂 Database: {}", db_url);

    let mut opt = ConnectOptions::new(&db_url);
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt).await?;

    info!("✅ Database connected successfully");

    run_migrations(&db).await?;

    Ok(db)
}

fn secondary_indexes() -> Vec<IndexCreateStatement> {
    vec![
        Index::create()
            .name("idx_videos_created_at")
            .table(videos::Entity)
            .col(videos::Column::CreatedAt)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_videos_user_id")
            .table(videos::Entity)
            .col(videos::Column::UserId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_videos_category")
            .table(videos::Entity)
            .col(videos::Column::Category)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_video_likes_user_id")
            .table(video_likes::Entity)
            .col(video_likes::Column::UserId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_video_comments_video_id")
            .table(video_comments::Entity)
            .col(video_comments::Column::VideoId)
            .if_not_exists()
            .to_owned(),
    ]
}

/// Creates every table and index that does not exist yet.
pub async fn run_migrations(db: &DatabaseConnection) -> anyhow::Result<()> {
    info!("🔄 Running SeaORM auto-migrations...");
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Parents before children so foreign keys resolve on PostgreSQL
    let tables = vec![
        schema
            .create_table_from_entity(users::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(categories::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(videos::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(video_likes::Entity)
            .if_not_exists()
            .to_owned(),
        schema
            .create_table_from_entity(video_comments::Entity)
            .if_not_exists()
            .to_owned(),
    ];

    for stmt in tables {
        db.execute(builder.build(&stmt)).await?;
    }

    for stmt in secondary_indexes() {
        if let Err(e) = db.execute(builder.build(&stmt)).await {
            warn!("⚠️ Index creation skipped: {}", e);
        }
    }

    Ok(())
}
