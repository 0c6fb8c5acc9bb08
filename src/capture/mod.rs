pub mod frame;
pub mod source;

pub use frame::RgbaFrame;
pub use source::{ChannelSource, FramePoll, FrameSource, RawFileSource};
