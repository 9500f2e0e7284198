pub mod attack;
pub mod board;
pub mod game;
pub mod generator;
pub mod layout;
pub mod levels;
pub mod piece;
pub mod rules;
