pub mod prelude;

pub mod categories;
pub mod users;
pub mod video_comments;
pub mod video_likes;
pub mod videos;
