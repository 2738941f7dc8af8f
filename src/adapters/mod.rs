// Adapters layer: concrete implementations behind the domain ports, plus CLI output.

pub mod fixtures;
pub mod memory;
pub mod report;
pub mod storage;
