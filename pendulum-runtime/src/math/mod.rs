pub use pid::{Gains, Pid, PidState};

mod pid;
