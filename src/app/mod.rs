// Presentation of engine results; the engine itself never formats.

pub mod report;
