pub mod report_writer;
pub mod transaction_reader;
pub mod transaction_writer;
