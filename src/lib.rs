#![allow(clippy::collapsible_if)]
#![deny(dead_code)]

pub mod assets;
pub mod config;
pub mod document;
pub mod edit;
pub mod error;
pub mod index;
pub mod publish;
pub mod session;
pub mod tools;
pub mod traits;
pub mod types;
