//! Journal domain: record model, asset roll-ups, chart series, checklists.
//!
//! SYSTEM CONTEXT
//! ==============
//! Nothing in this module touches the network or the database. Services load
//! entries, and routes call these functions to derive totals and series.

pub mod charts;
pub mod checklist;
pub mod format;
pub mod model;
pub mod totals;

pub use model::{Cash, ChecklistItem, JournalEntry, LineItem, MarketPhase, PsychologyCheck};
