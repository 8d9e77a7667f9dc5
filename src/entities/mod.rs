pub mod prelude;

pub mod card_tags;
pub mod cards;
pub mod categories;
pub mod tags;
pub mod users;
