// Event discovery pipeline: processing stages and record-store backends

pub mod processing;
pub mod storage;
