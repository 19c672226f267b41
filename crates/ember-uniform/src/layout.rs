//! Layout compilation: from descriptor trees to byte offsets

use crate::desc::{FieldNode, LayoutDesc};
use ember_core::{EmberError, FieldKind, Result};
use std::collections::HashMap;

/// Uniform buffers are sized in whole 16-byte rows; a layout whose leaf
/// fields sum to anything else gets a trailing pad up to the next row.
pub const UNIFORM_ALIGN: usize = 16;

/// One compiled field: kind, byte offset, and byte size.
///
/// Container fields are indexed at the offset of their first leaf
/// descendant and their size spans all their leaves, so a whole sub-struct
/// can be fetched as one blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutField {
    pub name: String,
    pub kind: FieldKind,
    pub offset: usize,
    pub size: usize,
}

/// A compiled, immutable buffer layout: the padded total size plus a
/// name-to-offset index built in deterministic pre-order.
///
/// The index stores offsets, never pointers into a byte store, so layouts
/// and the blocks built on them move and clone freely.
#[derive(Debug, Clone)]
pub struct BufferLayout {
    fields: Vec<LayoutField>,
    index: HashMap<String, usize>,
    unpadded_size: usize,
    size: usize,
}

impl BufferLayout {
    /// Compile a descriptor into a fixed layout.
    ///
    /// Walks the trees twice in the same pre-order: once to total up leaf
    /// storage (rounding the sum up to [`UNIFORM_ALIGN`]), once to assign
    /// offsets. Leaves are laid out consecutively with no gaps; the only
    /// padding is the single trailing alignment pad.
    pub fn compile(desc: &LayoutDesc) -> Result<Self> {
        let mut unpadded_size = 0usize;
        desc.visit(&mut |node| unpadded_size += node.kind().size());

        if unpadded_size == 0 {
            return Err(EmberError::InvalidLayout(
                "layout has no fields with storage".to_string(),
            ));
        }

        let size = unpadded_size.div_ceil(UNIFORM_ALIGN) * UNIFORM_ALIGN;
        if size != unpadded_size {
            log::debug!(
                "uniform layout padded from {} to {} bytes",
                unpadded_size,
                size
            );
        }

        let mut layout = Self {
            fields: Vec::new(),
            index: HashMap::new(),
            unpadded_size,
            size,
        };
        let mut cursor = 0usize;
        for node in desc.nodes() {
            layout.assign_offsets(node, &mut cursor)?;
        }

        Ok(layout)
    }

    /// Record `node` and its descendants starting at `*cursor`. Leaves
    /// advance the cursor by their storage size; containers record their
    /// entry at the cursor and let their children advance it.
    fn assign_offsets(&mut self, node: &FieldNode, cursor: &mut usize) -> Result<()> {
        let size = if node.kind().is_composite() {
            leaf_span(node)
        } else {
            node.kind().size()
        };

        if self.index.contains_key(node.name()) {
            return Err(EmberError::DuplicateField(node.name().to_string()));
        }
        self.index.insert(node.name().to_string(), self.fields.len());
        self.fields.push(LayoutField {
            name: node.name().to_string(),
            kind: node.kind(),
            offset: *cursor,
            size,
        });

        if node.kind().is_composite() {
            for child in node.children() {
                self.assign_offsets(child, cursor)?;
            }
        } else {
            *cursor += node.kind().size();
        }
        Ok(())
    }

    /// Total buffer size in bytes, including the trailing alignment pad
    pub fn size(&self) -> usize {
        self.size
    }

    /// Sum of all leaf field sizes, before alignment
    pub fn unpadded_size(&self) -> usize {
        self.unpadded_size
    }

    /// Trailing pad in bytes (zero when the leaf sum is already aligned)
    pub fn padding(&self) -> usize {
        self.size - self.unpadded_size
    }

    /// Look up a field by its qualified name
    pub fn field(&self, name: &str) -> Option<&LayoutField> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// All fields, in the pre-order they were assigned offsets
    pub fn fields(&self) -> &[LayoutField] {
        &self.fields
    }
}

/// Total storage of all leaves below (and including) `node`
fn leaf_span(node: &FieldNode) -> usize {
    let mut total = 0;
    node.visit(&mut |n| total += n.kind().size());
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_desc() -> LayoutDesc {
        let mut material = FieldNode::new("material", FieldKind::Struct);
        material.add_child("ambient", FieldKind::Float4).unwrap();
        material.add_child("diffuse", FieldKind::Float4).unwrap();

        let mut lights = FieldNode::new("lights", FieldKind::Array);
        lights.add_child("", FieldKind::Float4).unwrap();
        lights.add_child("", FieldKind::Float4).unwrap();

        LayoutDesc::new()
            .with_node(FieldNode::new("time", FieldKind::Float))
            .with_node(material)
            .with_node(lights)
    }

    #[test]
    fn test_size_rounds_up_to_sixteen() {
        // 4 + 8 + 12 = 24 bytes of leaves, padded to the next 16-byte row
        let desc = LayoutDesc::new()
            .with_node(FieldNode::new("a", FieldKind::Float))
            .with_node(FieldNode::new("b", FieldKind::Float2))
            .with_node(FieldNode::new("c", FieldKind::Float3));

        let layout = BufferLayout::compile(&desc).unwrap();
        assert_eq!(layout.unpadded_size(), 24);
        assert_eq!(layout.size(), 32);
        assert_eq!(layout.padding(), 8);
    }

    #[test]
    fn test_aligned_sum_gets_no_padding() {
        let desc = LayoutDesc::new()
            .with_node(FieldNode::new("model", FieldKind::Float4x4))
            .with_node(FieldNode::new("tint", FieldKind::Float4));

        let layout = BufferLayout::compile(&desc).unwrap();
        assert_eq!(layout.size(), 80);
        assert_eq!(layout.padding(), 0);
    }

    #[test]
    fn test_leaves_are_packed_consecutively() {
        let layout = BufferLayout::compile(&sample_desc()).unwrap();

        assert_eq!(layout.field("time").unwrap().offset, 0);
        assert_eq!(layout.field("material.ambient").unwrap().offset, 4);
        assert_eq!(layout.field("material.diffuse").unwrap().offset, 20);
        assert_eq!(layout.field("lights[0]").unwrap().offset, 36);
        assert_eq!(layout.field("lights[1]").unwrap().offset, 52);
    }

    #[test]
    fn test_container_spans_its_leaves() {
        let layout = BufferLayout::compile(&sample_desc()).unwrap();

        let material = layout.field("material").unwrap();
        assert_eq!(material.offset, 4);
        assert_eq!(material.size, 32);

        let lights = layout.field("lights").unwrap();
        assert_eq!(lights.offset, 36);
        assert_eq!(lights.size, 32);
    }

    #[test]
    fn test_offsets_are_deterministic_across_rebuilds() {
        let desc = sample_desc();
        let a = BufferLayout::compile(&desc).unwrap();
        let b = BufferLayout::compile(&desc).unwrap();
        assert_eq!(a.fields(), b.fields());
        assert_eq!(a.size(), b.size());
    }

    #[test]
    fn test_offsets_never_decrease_in_preorder() {
        let layout = BufferLayout::compile(&sample_desc()).unwrap();
        let mut last = 0;
        for field in layout.fields() {
            assert!(field.offset >= last);
            last = field.offset;
        }
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let desc = LayoutDesc::new()
            .with_node(FieldNode::new("time", FieldKind::Float))
            .with_node(FieldNode::new("time", FieldKind::Float4));

        let err = BufferLayout::compile(&desc).unwrap_err();
        assert!(matches!(err, EmberError::DuplicateField(name) if name == "time"));
    }

    #[test]
    fn test_storage_free_layout_is_rejected() {
        let desc = LayoutDesc::new().with_node(FieldNode::new("empty", FieldKind::Struct));
        let err = BufferLayout::compile(&desc).unwrap_err();
        assert!(matches!(err, EmberError::InvalidLayout(_)));
    }
}
