mod clock;
pub use clock::{Clock, ManualClock, SystemClock};

mod comment;
pub use comment::Comment;

mod order;
pub use order::{OrderExt, Ranked};

mod projection;
pub use projection::project_for;

pub mod resolver;
pub use resolver::Slot;

mod thread;
pub use thread::{Limits, Thread, ThreadStore};

#[cfg(test)]
mod fuzz;

pub mod api {
    pub use lectern_api::*;
}

pub mod prelude {
    pub use crate::{Clock, OrderExt, Ranked};
}
