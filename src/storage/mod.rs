pub mod db;
mod likes;
pub mod models;
mod photos;
mod tables;

pub use db::{Database, DatabaseError};
pub use tables::*;
