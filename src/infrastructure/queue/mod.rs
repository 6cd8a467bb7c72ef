pub mod channel;

pub use channel::{channel, JobReceiver};
