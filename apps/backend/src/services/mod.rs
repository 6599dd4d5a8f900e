pub mod game_flow;
pub mod game_store;
pub mod games;
pub mod question_sweeper;
pub mod users;
