mod status;
pub use status::WatchStatus;

mod deploy;
pub use deploy::{DeployStatus, SERVER_COMPONENT, SERVER_DOWN, SERVER_OK};

mod client;
pub use client::ClientEntry;

mod field;
pub use field::FieldPath;

mod system;
pub use system::SystemInfo;
