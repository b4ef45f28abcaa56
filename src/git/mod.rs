pub mod branch;
pub mod commit;
pub mod decode;
pub mod identity;
pub mod quote;
pub mod remote;
pub mod runner;
pub mod status;

pub use decode::Decoder;
pub use runner::SystemRunner;
