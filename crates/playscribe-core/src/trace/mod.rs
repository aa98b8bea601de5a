mod reader;
mod types;
mod writer;

pub use reader::TraceReader;
pub use types::*;
pub use writer::TraceWriter;
