//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the routing layer decoupled from storage details.

pub mod task_service;

pub use task_service::TaskService;
