#![doc = include_str!("RUSTDOC.md")]

pub mod app;
pub mod component;
pub mod data_connect;
pub mod dataconnect_generated;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod test_support;
