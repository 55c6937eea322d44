//! Narrow model of the host chat window: its node tree, message view-models
//! and the services an augmentation may call.

pub mod document;
pub mod message;
pub mod services;

pub use document::{Document, MutationRecord, NodeId, Rect};
pub use message::{MarketFaceElement, MsgElement, MsgRecord, PicElement, TextElement};
pub use services::{AvatarDirectory, AvatarSource, DesktopServices, HostServices};
