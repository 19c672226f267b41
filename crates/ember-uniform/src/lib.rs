//! Ember Uniform - runtime-declared uniform buffer layouts
//!
//! Calling code declares a tree of named, typed fields, compiles it into a
//! fixed byte layout (offsets plus a trailing pad up to the 16-byte uniform
//! alignment), then reads and writes fields by qualified name every frame.
//! A cheap content hash decides whether the GPU copy is stale, so unchanged
//! buffers skip their upload entirely.
//!
//! ```
//! use ember_core::FieldKind;
//! use ember_uniform::{FieldNode, LayoutDesc, UniformBlock};
//!
//! let mut material = FieldNode::new("material", FieldKind::Struct);
//! material.add_child("ambient", FieldKind::Float4).unwrap();
//!
//! let desc = LayoutDesc::new()
//!     .with_node(FieldNode::new("exposure", FieldKind::Float))
//!     .with_node(material);
//!
//! let mut block = UniformBlock::new(&desc).unwrap();
//! block.write("material.ambient", [0.1f32, 0.1, 0.1, 1.0]).unwrap();
//! assert_eq!(block.read::<f32>("exposure").unwrap(), 0.0);
//! ```

mod block;
mod desc;
mod layout;

pub use block::UniformBlock;
pub use desc::{FieldNode, LayoutDesc};
pub use layout::{BufferLayout, LayoutField, UNIFORM_ALIGN};
