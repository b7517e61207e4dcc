pub mod app;
pub mod backend;
pub mod chat;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod theme;
pub mod uploader;
pub mod worker;
