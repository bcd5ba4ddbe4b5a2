pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod engine;
pub mod models;

#[cfg(test)]
mod test;
