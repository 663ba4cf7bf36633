//! Report formatting, transport-sized segmentation, and LINE delivery.

pub mod error;
pub mod format;
pub mod line;
pub mod segment;

pub use error::NotifierError;
pub use format::{format_message, today_jst};
pub use line::{LineClient, MAX_MESSAGES_PER_PUSH};
pub use segment::{format_and_split, split_message, MessageBlock};
