pub mod balance;
pub mod crime;
pub mod pay;
pub mod rob;
pub mod work;
