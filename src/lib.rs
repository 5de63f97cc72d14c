pub mod api;
pub mod config;
pub mod detail;
pub mod detail_view;
pub mod error;
pub mod format;
pub mod home;
pub mod http_client;
pub mod load;
pub mod logging;
pub mod model;
pub mod provider;
pub mod render;
pub mod state;
