pub mod create;
pub mod download;
