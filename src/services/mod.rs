pub mod media_host;
pub mod video_service;
