pub mod banner;
pub mod chat_panel;
pub mod feed;
pub mod home;
pub mod metric_tile;
pub mod portal;
pub mod section;
