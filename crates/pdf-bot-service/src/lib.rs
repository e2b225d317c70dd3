pub mod config;
pub mod conversation;
pub mod document;
pub mod error;
pub mod service;
pub mod session;
pub mod storage;
