pub mod frame_loop;
pub mod relay_link;
pub mod session;

pub use frame_loop::{FrameLoop, Renderer};
pub use relay_link::RelayLink;
pub use session::{FrameOutcome, FrameView, Session};
