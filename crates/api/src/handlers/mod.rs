//! HTTP request handlers, grouped by resource.

pub mod assignment;
pub mod auth;
pub mod jobs;
pub mod notification;
