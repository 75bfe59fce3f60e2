pub mod admin;
pub mod buy_ticket;
pub mod commit_randomness;
pub mod draw_numbers;
pub mod settle_entry;
pub mod shared;
pub mod views;

pub use admin::*;
pub use buy_ticket::*;
pub use commit_randomness::*;
pub use draw_numbers::*;
pub use settle_entry::*;
pub use views::*;
