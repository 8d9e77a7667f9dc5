pub mod cards;
pub mod categories;
pub mod tags;
pub mod users;
