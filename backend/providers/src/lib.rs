pub mod mock;
pub mod sse;
pub mod together;

pub use mock::MockProvider;
pub use together::TogetherProvider;
