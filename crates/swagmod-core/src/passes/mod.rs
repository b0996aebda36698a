//! Document rewriting passes.
//!
//! Each pass is a self-contained transformation over the bundled document.
//! Passes run in strict order (0-4, plus the off-document config emitter) and
//! each assumes the output shape of its predecessors: renaming relies on
//! promotion having run, and pruning relies on the renamer's reference set.

pub mod p0_promote;
pub mod p1_dictionaries;
pub mod p2_enum_arrays;
pub mod p3_rename;
pub mod p4_prune;
pub mod p5_generator_config;
