pub mod enums;
pub mod ids;
pub mod time;

pub use enums::*;
pub use ids::*;
pub use time::*;
