mod cycle;
mod lift;
mod log;

pub use cycle::{Cycle, CycleRecord, Phase};
pub use lift::{Increment, Lift, LiftChanges, LiftRecord, Round};
pub(crate) use lift::validate_max;
pub use log::{Log, LogRecord, NewLog};
