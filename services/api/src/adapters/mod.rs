pub mod auth;
pub mod d1;
pub mod db;
