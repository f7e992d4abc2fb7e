pub mod tree;
pub mod selector;
pub mod vdom;
mod parser;
mod serialize;

pub use selector::Selector;
pub use tree::{DocumentTree, Float};
pub use vdom::{NodeId, VDom, OFFSET_TOP_ATTRIBUTE};
