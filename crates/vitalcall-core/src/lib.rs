pub mod call_id;
pub mod duration;
pub mod extract;
pub mod normalize;
pub mod preview;
pub mod types;

pub use call_id::{CallId, CallIdError};
pub use duration::{compute_duration, CallDuration};
pub use extract::{extract, FamilyHistory, PatientInfo};
pub use normalize::{normalize, CallRecord, RecordingLinks};
pub use preview::{format_for_list, CallPreview, PREVIEW_CHARS};
pub use types::*;
