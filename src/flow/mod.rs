pub mod builder;
pub mod catalogue;
pub mod data;
pub mod definition;
pub mod extract;

pub use builder::*;
pub use catalogue::*;
pub use data::NodeData;
pub use definition::*;
pub use extract::{
    CANNED_ACKNOWLEDGMENT, extract_flow, extract_flow_json, strip_flow_blocks, visible_reply,
};
