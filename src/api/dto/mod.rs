//! API DTOs

pub mod common;
pub mod feeder;
pub mod user;

pub use common::ApiResponse;
pub use feeder::{FeederDto, FeederUpdateDto, StaffDto};
pub use user::UserDto;
