use serde::{Deserialize, Serialize};

/// Instruction sent with every image. Identical for every request.
pub const MARKDOWN_PROMPT: &str = "Convert the provided image into Markdown format.\nEnsure that all page content is included, such as headers, footers, subtexts, images (with alt text if possible), tables, and any other elements.\n\nRequirements:\n\n- Markdown only output: return only the Markdown content without any additional explanations or comments.\n- No Delimiters: Do not use code boundaries or delimiters like ```markdown.\n- Complete Content: Do not omit any part of the page, including headers, footers, and subtext.\n";

/// Vision-capable model requested when none is configured.
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-3.2-11B-Vision-Instruct-Turbo";

/// File extensions the upload surfaces accept (lowercase, no dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// Largest upload embedded into a single request: 20 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// A single streamed chat-completion request carrying one prompt and one image.
///
/// Serializes to the OpenAI-compatible `/chat/completions` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

impl VisionRequest {
    /// Build the one-message request: a text part followed by an image part.
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        image_data_uri: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: prompt.into(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_data_uri.into(),
                        },
                    },
                ],
            }],
            stream: true,
        }
    }

    /// The text part of the first message, if any.
    pub fn prompt(&self) -> Option<&str> {
        self.parts().find_map(|part| match part {
            ContentPart::Text { text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// The image URL of the first message, if any.
    pub fn image_url(&self) -> Option<&str> {
        self.parts().find_map(|part| match part {
            ContentPart::ImageUrl { image_url } => Some(image_url.url.as_str()),
            _ => None,
        })
    }

    fn parts(&self) -> impl Iterator<Item = &ContentPart> {
        self.messages.iter().flat_map(|m| m.content.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

/// One element of a multimodal message body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}
