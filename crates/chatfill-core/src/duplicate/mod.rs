//! Chat duplication pipeline.
//!
//! # Module Structure
//!
//! - `guard`: Precondition check (`check_preconditions`, `GuardRejection`)
//! - `selector`: Position resolution against a snapshot (`select`, `Selection`)
//! - `duplicator`: The orchestrating state machine (`ChatDuplicator`)
//! - `outcome`: Terminal outcomes (`DuplicationReport`, `DuplicationFailure`)
//! - `notification`: User-facing summaries of outcomes (`Notification`)

mod duplicator;
mod guard;
mod notification;
mod outcome;
mod selector;

pub use duplicator::ChatDuplicator;
pub use guard::{GuardRejection, GuardResult, check_preconditions};
pub use notification::{Notification, NotificationCallback, NotificationLevel, summarize};
pub use outcome::{
    AppendFailed, DuplicationFailure, DuplicationNotice, DuplicationReport, DuplicationResult,
    DuplicationState,
};
pub use selector::{SelectedMessage, Selection, SelectionError, select};
