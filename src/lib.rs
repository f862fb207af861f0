//! Form wizard: a three-step form with persisted progress and guarded routes.

pub mod config;
pub mod controllers;
pub mod error;
pub mod guard;
pub mod navigation;
pub mod store;
pub mod submission;
pub mod wizard;
