pub mod tiktok;
pub mod youtube;
