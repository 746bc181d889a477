//! Deadlock detection on a snapshot of multi-instance resource allocation.
//!
//! `rag_core` decides, from one captured [`Scenario`] (total units per
//! resource class, units held and units still requested per process), which
//! processes can never finish. It implements the classical reduction of the
//! resource-allocation graph: repeatedly pick a process whose outstanding
//! request fits in the free units, let it finish, and return what it held.
//! Processes that are never picked are deadlocked.
//!
//! # Pipeline
//!
//! ```text
//! Scenario --Snapshot::new--> Snapshot --detect--> Snapshot --Report::new--> Report
//! ```
//!
//! 1. [`Snapshot::new`] validates the scenario. It is the only fallible step:
//!    mis-shaped tables and over-committed resource classes are rejected
//!    there.
//! 2. [`detect()`] (or [`detect_with`] for a chosen [`Strategy`] and the
//!    reduction trace) mutates the snapshot in place. It always succeeds and
//!    always terminates.
//! 3. [`Report`] lists the deadlocked processes in ascending order.
//!
//! ```rust,ignore
//! use rag_core::{detect, Report, Scenario, Snapshot};
//!
//! let scenario = Scenario::new(
//!     vec![1, 1],
//!     vec![vec![1, 0], vec![0, 1]],
//!     vec![vec![0, 1], vec![1, 0]],
//! );
//! let snapshot = detect(Snapshot::new(&scenario)?);
//! assert_eq!(Report::new(&snapshot).deadlocked, vec![0, 1]);
//! ```
//!
//! # Crate features
//!
//! - **`serde`** -- `Serialize`/`Deserialize` on [`Scenario`], [`Report`],
//!   [`Reduction`], [`Strategy`] and the error types.
//! - **`schemars`** -- `JsonSchema` on [`Scenario`] and [`Report`].
//!
//! This crate is `no_std` compatible (requires `alloc`). The text parser
//! lives in `rag_parser` and the random generator in `rag_testgen`.

#![cfg_attr(not(any(test, feature = "schemars")), no_std)]
extern crate alloc;

pub mod detection;
pub mod matrix;
pub mod report;
pub mod scenario;
pub mod snapshot;

pub use detection::{detect, detect_with, Reduction, Strategy};
pub use report::Report;
pub use scenario::{format_scenario, Scenario};
pub use snapshot::Snapshot;
