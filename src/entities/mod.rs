pub mod point_transactions;
pub mod user_actions;
pub mod users;

pub use point_transactions as point_transaction_entity;
pub use point_transactions::TransactionType;
pub use user_actions as user_action_entity;
pub use user_actions::{ActionDetails, ActionType};
pub use users as user_entity;
pub use users::UserRole;
