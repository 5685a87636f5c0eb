pub mod args;
pub mod op;
pub mod ops;

pub use ops::{Daemon, Digest, Health, Init, PublicKey, Sign, Verify, Version};
