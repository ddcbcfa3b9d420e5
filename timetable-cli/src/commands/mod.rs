pub mod departments;
pub mod export;
pub mod import;
pub mod modules;
pub mod show;
