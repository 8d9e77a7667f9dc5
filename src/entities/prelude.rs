pub use super::card_tags::Entity as CardTags;
pub use super::cards::Entity as Cards;
pub use super::categories::Entity as Categories;
pub use super::tags::Entity as Tags;
pub use super::users::Entity as Users;
