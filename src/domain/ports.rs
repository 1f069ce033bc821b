use crate::domain::state::Side;

// Port for reading a monotonic time source, in milliseconds.
pub trait Clock: Send {
    fn now_millis(&self) -> u64;
}

// Port for picking who serves first when a match starts.
pub trait ServeToss: Send {
    fn toss(&mut self) -> Side;
}
