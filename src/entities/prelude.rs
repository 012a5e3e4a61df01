pub use super::categories::Entity as Categories;
pub use super::users::Entity as Users;
pub use super::video_comments::Entity as VideoComments;
pub use super::video_likes::Entity as VideoLikes;
pub use super::videos::Entity as Videos;
