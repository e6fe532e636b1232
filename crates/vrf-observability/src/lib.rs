mod blockchain;
mod proof_of_work;
mod task;

pub use blockchain::*;
pub use proof_of_work::*;
pub use task::*;
