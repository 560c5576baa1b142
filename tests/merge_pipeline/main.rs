//! End-to-end merges over real `.safetensors` files.

mod common;
mod facade;
mod merge_rules;
mod metadata;
