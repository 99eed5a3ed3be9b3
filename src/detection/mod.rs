pub mod detector;
pub mod failure_window;

pub use detector::ActivityDetector;
pub use failure_window::FailureWindow;
