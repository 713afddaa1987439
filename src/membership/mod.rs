//! Zone membership bookkeeping.
//!
//! - [`MembershipRecord`]: zones one member occupies plus cached flags
//! - [`MembershipTracker`]: records for one member kind, with enter/exit

mod record;
mod tracker;

pub use record::MembershipRecord;
pub use tracker::MembershipTracker;
