#![allow(clippy::new_without_default)]

pub mod image;
pub mod image_norm;
pub mod image_formats;
pub mod fs_utils;
pub mod log_utils;
pub mod shots_info;
pub mod folders;
pub mod config;
pub mod progress;
pub mod converter;
