pub mod error;
pub mod session;
pub mod traits;
pub mod types;

pub use error::ScanError;
pub use session::{AnalysisOutcome, Credential, Session, Upload};
pub use traits::{FragmentStream, VisionProvider};
pub use types::{
    ChatMessage, ContentPart, ImageUrl, VisionRequest, ALLOWED_EXTENSIONS,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_MODEL, MARKDOWN_PROMPT,
};
