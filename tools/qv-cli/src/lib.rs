//! QV CLI: terminal client for the quadratic-vote backend.
//!
//! ```text
//! qv polls --preset trending --live        # browse the feed
//! qv show 7                                # details and results
//! qv vote 7 --set Yes=60 --set No=16       # allocate and submit
//! qv vote 7 --set Yes=60 --dry-run         # preview weights and gate
//! qv create --title ... --option A --option B --tags "dao, infra"
//! qv delete 7
//! qv profile                               # your counters and recent activity
//! qv activities --user 0xabc --filter participated
//! ```

pub mod args;
pub mod commands;
pub mod render;

pub use args::Cli;
