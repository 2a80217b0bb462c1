mod domain;
pub use domain::{ClientEntry, DeployStatus, FieldPath, SystemInfo, WatchStatus};
pub use domain::{SERVER_COMPONENT, SERVER_DOWN, SERVER_OK};

mod error;
pub use error::{ModelError, ModelResult};

mod record;
pub use record::{DownSnapshot, JobSnapshot, KitFingerprint, PollRecord, RECORD_KEYS, RecordBody};
