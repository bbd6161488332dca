// Application layer: user actions wired to the API client and output rendering.

pub mod commands;
pub mod render;
