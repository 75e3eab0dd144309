//! BoardGuard - PCB object model and design rule check library
//!
//! This library models the copper features of a circuit board (traces,
//! vias, pads, components and copper pours) and checks collections of them
//! against manufacturing rules such as minimum trace width, annular ring
//! and clearance.
//!
//! # Quick Start
//!
//! ```no_run
//! use boardguard::{BoardGuardCore, ValidationOptions};
//! use std::path::Path;
//!
//! let options = ValidationOptions::default();
//! let result = BoardGuardCore::validate_board(
//!     Path::new("main.pcb.json"),
//!     &options,
//! ).unwrap();
//!
//! for violation in &result.violations {
//!     println!("{:?}: {}", violation.severity, violation.message);
//! }
//! ```
//!
//! # Features
//!
//! - **Object model**: exact hit-testing, cached bounds, record round-trips
//! - **Copper pours**: clearance voids and thermal relief spokes
//! - **DRC**: structural checks plus net-aware pairwise clearance
//! - **Spatial index**: optional R-tree clearance pass

pub mod board;
pub mod core;
pub mod drc;
pub mod geometry;
pub mod model;
pub mod rules;

// Re-export main types
pub use board::{Board, BoardEvent, ObjectProblems};
pub use crate::core::{
    discover_board_files, BoardGuardCore, BoardGuardError, ValidationOptions, ValidationResult,
    ValidationStats,
};
pub use drc::{DrcEngine, DrcOutcome, DrcState, DrcSummary, Severity, Violation, ViolationType};
pub use geometry::{BoundingBox, Point};
pub use model::{
    Component, Geometry, ObjectKind, ObjectLimits, ObjectRecord, Pad, PadShape, PadSize, PcbObject,
    Polygon, PourSettings, Trace, Via, ViaType,
};
pub use rules::{DesignRules, RulePreset};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Board, BoardGuardCore, BoardGuardError, DesignRules, DrcEngine, ObjectKind, PcbObject,
        Point, RulePreset, Severity, ValidationOptions, ValidationResult, Violation,
        ViolationType,
    };
}
