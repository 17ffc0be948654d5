pub mod api_client;
pub mod client;
pub mod cmd;
pub mod config;
pub mod error;
pub mod images;
pub mod navigation;
pub mod repository;
pub mod types;
pub mod view;
