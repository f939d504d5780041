pub mod aggregate;
pub mod auth;
pub mod config;
pub mod db;
pub mod draft;
pub mod error;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod services;
pub mod storage;
pub mod tracker;

#[cfg(test)]
mod test_support;
