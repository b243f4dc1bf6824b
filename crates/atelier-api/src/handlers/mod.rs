//! HTTP handler modules for atelier-api.

pub mod assist;
pub mod notes;
pub mod projects;
pub mod todos;
