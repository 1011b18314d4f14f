pub mod appointment;
pub mod consultation;
pub mod enums;
pub mod patient;
pub mod user;

pub use appointment::*;
pub use consultation::*;
pub use enums::*;
pub use patient::*;
pub use user::*;
