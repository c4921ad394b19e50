pub mod charts;
pub mod filter;
pub mod losses;
