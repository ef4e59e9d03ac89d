pub use arena::*;
pub use error::*;
pub use llrb::*;
pub use query::*;
pub use red_black_tree::*;
pub use stack_tree::*;
pub use tree::*;
pub use utils::*;

pub mod arena;
pub mod error;
pub mod llrb;
pub mod query;
pub mod red_black_tree;
pub mod stack_tree;
pub mod tree;
pub mod utils;
