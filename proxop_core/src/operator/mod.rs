//! Operator traits and device resources shared by every block and prox.

mod op_error;
mod linalg;
mod devbuf;
mod block;
mod prox;

pub use op_error::*;
pub use linalg::*;
pub use devbuf::*;
pub use block::*;
pub use prox::*;
