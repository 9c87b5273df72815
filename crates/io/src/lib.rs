// Workspace persistence

pub mod json;
pub mod native;
