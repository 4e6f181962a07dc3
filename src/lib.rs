pub mod app;
pub mod backup;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
