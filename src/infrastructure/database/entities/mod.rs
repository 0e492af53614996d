//! Database entities module

pub mod assignment;
pub mod feeder;
pub mod feeder_update;
pub mod user;

pub use assignment::Entity as Assignment;
pub use feeder::Entity as Feeder;
pub use feeder_update::Entity as FeederUpdate;
pub use user::Entity as User;
