//! Ember Core - Foundational types for the Ember demos
//!
//! This crate provides the types every other Ember crate depends on:
//! - `FieldKind` - The closed set of uniform-buffer field kinds
//! - `StateHash` - Cheap rolling hash for change detection
//! - `Vec3` and matrix helpers - Camera and transform math
//! - Error types and Result alias

mod error;
mod hash;
mod kind;
mod math;

pub use error::{EmberError, Result};
pub use hash::StateHash;
pub use kind::FieldKind;
pub use math::{mat4_identity, mat4_mul, mat4_rotation_y, Vec3};
