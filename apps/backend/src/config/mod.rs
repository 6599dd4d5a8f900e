pub mod game;
pub mod server;

pub use game::rules_from_env;
pub use server::ServerConfig;
