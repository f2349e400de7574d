//! wgpu render pipelines.

pub mod sprite;
