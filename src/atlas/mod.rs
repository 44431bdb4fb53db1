mod builder;
mod mask;
mod session;
mod types;

pub use builder::{AtlasBuilder, PackOutcome};
pub use mask::render_mask;
pub use session::PackingSession;
pub use types::AtlasCanvas;
