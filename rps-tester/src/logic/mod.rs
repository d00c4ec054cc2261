pub mod harness;
pub mod reports;
pub mod tester;

pub use harness::PageHarness;
pub use tester::*;
