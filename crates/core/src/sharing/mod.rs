pub mod sharing_calculator;

#[cfg(test)]
mod sharing_calculator_tests;

pub use sharing_calculator::{canceled_share, savings_of, share_of, total_member_count};
