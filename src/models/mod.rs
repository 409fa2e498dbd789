pub mod firearm;
pub mod price;

pub use firearm::{Attachment, Firearm};
pub use price::Price;
