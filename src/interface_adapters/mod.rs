// Interface adapters: wire protocol, network handling and port implementations.

pub mod net;
pub mod protocol;
pub mod state;
