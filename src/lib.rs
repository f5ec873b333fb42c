pub mod assistant;
pub mod citations;
pub mod config;
pub mod gemini;
pub mod instructions;
pub mod models;
pub mod server;

#[cfg(test)]
mod testing;

pub use config::AppConfig;
pub use server::run_server;
