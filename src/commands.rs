pub mod evaluate;
pub mod filter;
pub mod inspect;
