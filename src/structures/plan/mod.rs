mod node;
mod place;
mod plan;
mod summary;

pub use node::*;
pub use place::*;
pub use plan::*;
pub use summary::*;
