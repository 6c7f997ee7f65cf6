/// Harness for driving an app in tests.
pub mod harness;
/// Instrumented widgets for tests.
pub mod widgets;

pub use harness::Harness;
