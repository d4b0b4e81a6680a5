pub mod bucket;
pub mod common;
pub mod confidence;
pub mod config;
pub mod cycle;
pub mod peak;
pub mod question;
pub mod replay;
pub mod schedule;
