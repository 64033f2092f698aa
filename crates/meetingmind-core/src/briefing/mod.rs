//! Pre-meeting briefings.
//!
//! - `format`: renders retrieved memories and open commitments into the
//!   text blocks a briefing is generated from
//! - `orchestrator`: gathers that context for a contact and streams the
//!   narrative as [`BriefingEvent`](meetingmind_types::briefing::BriefingEvent)s

pub mod format;
pub mod orchestrator;
