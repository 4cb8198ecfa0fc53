pub mod banners;
pub mod categories;
pub mod medicines;
pub mod users;

pub use banners::Entity as Banners;
pub use categories::Entity as Categories;
pub use medicines::Entity as Medicines;
pub use users::Entity as Users;
