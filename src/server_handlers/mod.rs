pub mod docs;
pub mod sessions;

pub use docs::*;
pub use sessions::*;
