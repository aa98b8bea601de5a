pub mod completion;
pub mod record;
pub mod render;
