pub mod pagination;
pub mod points;
pub mod transaction;
pub mod user_action;

pub use pagination::*;
pub use points::*;
pub use transaction::*;
pub use user_action::*;
