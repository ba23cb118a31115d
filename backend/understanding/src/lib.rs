pub mod ocr;
pub mod stream;
pub mod vision;

pub use ocr::{OcrConfig, OcrService};
pub use stream::accumulate;
pub use vision::{build_request, data_uri, encode_image};
