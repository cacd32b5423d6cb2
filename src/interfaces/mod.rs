//! Input and output formats at the edge of the pipeline.

pub mod csv;
