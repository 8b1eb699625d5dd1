pub mod record;
pub mod watermark;

pub use record::Record;
pub use watermark::Watermark;
