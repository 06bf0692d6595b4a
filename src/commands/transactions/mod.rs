mod discard;
mod exec;
mod multi;

pub use discard::{DiscardArguments, discard};
pub use exec::{ExecArguments, exec};
pub use multi::{MultiArguments, multi};
