pub mod daemon;
pub mod digest;
pub mod health;
pub mod init;
pub mod public_key;
pub mod sign;
pub mod verify;
pub mod version;

pub use daemon::Daemon;
pub use digest::Digest;
pub use health::Health;
pub use init::Init;
pub use public_key::PublicKey;
pub use sign::Sign;
pub use verify::Verify;
pub use version::Version;
