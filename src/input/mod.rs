pub mod file_reader;
pub mod generator;

pub use file_reader::LogFileReader;
pub use generator::LogGenerator;
