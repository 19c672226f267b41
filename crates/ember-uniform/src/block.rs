//! Byte-backed uniform blocks with named, typed access

use crate::desc::LayoutDesc;
use crate::layout::BufferLayout;
use bytemuck::Pod;
use ember_core::{EmberError, Result, StateHash};

/// A CPU-side uniform buffer: a compiled layout, its zero-initialized byte
/// store, and the content hash recorded at the last upload.
///
/// Reads and writes go through qualified field names. The store never
/// resizes after construction, and all access resolves offsets against the
/// current base, so blocks move and clone without fixups. Writes that leave
/// the bytes unchanged also leave the block clean, which is what lets an
/// unchanged buffer skip its GPU upload for the frame.
#[derive(Debug, Clone)]
pub struct UniformBlock {
    layout: BufferLayout,
    bytes: Vec<u8>,
    clean_hash: StateHash,
}

impl UniformBlock {
    /// Compile `desc` and allocate the zeroed backing store. A fresh block
    /// starts clean: the hash of the zeroed store is the upload baseline,
    /// matching the initial upload performed when the GPU buffer is created
    /// from these contents.
    pub fn new(desc: &LayoutDesc) -> Result<Self> {
        let layout = BufferLayout::compile(desc)?;
        let bytes = vec![0u8; layout.size()];
        let clean_hash = StateHash::from_bytes(&bytes);
        Ok(Self {
            layout,
            bytes,
            clean_hash,
        })
    }

    pub fn layout(&self) -> &BufferLayout {
        &self.layout
    }

    /// Read-only view of the whole backing store
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Raw view of one field's storage. A container yields all of its
    /// leaves as one contiguous blob.
    pub fn field_bytes(&self, name: &str) -> Option<&[u8]> {
        let field = self.layout.field(name)?;
        Some(&self.bytes[field.offset..field.offset + field.size])
    }

    /// Write a value over a field's storage.
    ///
    /// An unknown name logs a warning and leaves the store untouched, so a
    /// typo or a not-yet-added field never stalls the render loop. A size
    /// mismatch between `T` and the field's declared kind is an error.
    pub fn write<T: Pod>(&mut self, name: &str, value: T) -> Result<()> {
        let Some(field) = self.layout.field(name) else {
            log::warn!("write to unknown uniform field {name:?} ignored");
            return Ok(());
        };
        let src = bytemuck::bytes_of(&value);
        if src.len() != field.size {
            return Err(EmberError::FieldTypeMismatch {
                field: name.to_string(),
                expected: field.size,
                got: src.len(),
            });
        }
        let offset = field.offset;
        self.bytes[offset..offset + src.len()].copy_from_slice(src);
        Ok(())
    }

    /// Read a field back as a typed value, bit-identical to the last write.
    /// Field offsets are not aligned for `T`, so the value is copied out.
    pub fn read<T: Pod>(&self, name: &str) -> Result<T> {
        let field = self
            .layout
            .field(name)
            .ok_or_else(|| EmberError::FieldNotFound(name.to_string()))?;
        if std::mem::size_of::<T>() != field.size {
            return Err(EmberError::FieldTypeMismatch {
                field: name.to_string(),
                expected: field.size,
                got: std::mem::size_of::<T>(),
            });
        }
        Ok(bytemuck::pod_read_unaligned(
            &self.bytes[field.offset..field.offset + field.size],
        ))
    }

    /// Hash of the current store contents
    pub fn content_hash(&self) -> StateHash {
        StateHash::from_bytes(&self.bytes)
    }

    /// Whether the store has changed since the last [`mark_clean`](Self::mark_clean)
    pub fn is_dirty(&self) -> bool {
        self.content_hash() != self.clean_hash
    }

    /// Record the current contents as uploaded
    pub fn mark_clean(&mut self) {
        self.clean_hash = self.content_hash();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desc::FieldNode;
    use ember_core::FieldKind;

    fn block_of(fields: &[(&str, FieldKind)]) -> UniformBlock {
        let mut desc = LayoutDesc::new();
        for &(name, kind) in fields {
            desc.add_node(FieldNode::new(name, kind));
        }
        UniformBlock::new(&desc).unwrap()
    }

    #[test]
    fn test_round_trip_every_leaf_kind() {
        let mut block = block_of(&[
            ("flag", FieldKind::Bool),
            ("t", FieldKind::Float),
            ("uv", FieldKind::Float2),
            ("dir", FieldKind::Float3),
            ("tint", FieldKind::Float4),
            ("tbn", FieldKind::Float3x3),
            ("model", FieldKind::Float4x4),
        ]);

        block.write("flag", 1u32).unwrap();
        block.write("t", 0.25f32).unwrap();
        block.write("uv", [0.5f32, -1.5]).unwrap();
        block.write("dir", [1.0f32, 2.0, 3.0]).unwrap();
        block.write("tint", [0.1f32, 0.2, 0.3, 0.4]).unwrap();

        let tbn = [[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        block.write("tbn", tbn).unwrap();
        let mut model = [[0.0f32; 4]; 4];
        for (i, col) in model.iter_mut().enumerate() {
            for (j, v) in col.iter_mut().enumerate() {
                *v = (i * 4 + j) as f32;
            }
        }
        block.write("model", model).unwrap();

        assert_eq!(block.read::<u32>("flag").unwrap(), 1);
        assert_eq!(block.read::<f32>("t").unwrap(), 0.25);
        assert_eq!(block.read::<[f32; 2]>("uv").unwrap(), [0.5, -1.5]);
        assert_eq!(block.read::<[f32; 3]>("dir").unwrap(), [1.0, 2.0, 3.0]);
        assert_eq!(
            block.read::<[f32; 4]>("tint").unwrap(),
            [0.1, 0.2, 0.3, 0.4]
        );
        assert_eq!(block.read::<[[f32; 3]; 3]>("tbn").unwrap(), tbn);
        assert_eq!(block.read::<[[f32; 4]; 4]>("model").unwrap(), model);
    }

    #[test]
    fn test_frame_constants_scenario() {
        // One float, one float2, and a struct holding a float4:
        // 4 + 8 + 16 = 28 bytes of leaves, padded to 32.
        let mut mat = FieldNode::new("mat", FieldKind::Struct);
        mat.add_child("ambient", FieldKind::Float4).unwrap();
        let desc = LayoutDesc::new()
            .with_node(FieldNode::new("a", FieldKind::Float))
            .with_node(FieldNode::new("b", FieldKind::Float2))
            .with_node(mat);

        let mut block = UniformBlock::new(&desc).unwrap();
        let layout = block.layout();
        assert_eq!(layout.unpadded_size(), 28);
        assert_eq!(layout.size(), 32);
        assert_eq!(layout.field("a").unwrap().offset, 0);
        assert_eq!(layout.field("b").unwrap().offset, 4);
        assert_eq!(layout.field("mat.ambient").unwrap().offset, 12);

        block.write("a", 3.14f32).unwrap();
        assert_eq!(block.read::<f32>("a").unwrap(), 3.14);
    }

    #[test]
    fn test_write_to_unknown_field_is_a_logged_noop() {
        let mut block = block_of(&[("t", FieldKind::Float)]);
        let before = block.bytes().to_vec();

        block.write("missing", 1.0f32).unwrap();
        assert_eq!(block.bytes(), &before[..]);
        assert!(!block.is_dirty());
    }

    #[test]
    fn test_read_of_unknown_field_is_not_found() {
        let block = block_of(&[("t", FieldKind::Float)]);
        let err = block.read::<f32>("missing").unwrap_err();
        assert!(matches!(err, EmberError::FieldNotFound(name) if name == "missing"));
    }

    #[test]
    fn test_size_mismatch_is_an_error_not_a_corruption() {
        let mut block = block_of(&[("t", FieldKind::Float)]);
        let before = block.bytes().to_vec();

        let err = block.write("t", [1.0f32, 2.0]).unwrap_err();
        assert!(matches!(err, EmberError::FieldTypeMismatch { .. }));
        assert_eq!(block.bytes(), &before[..]);

        let err = block.read::<[f32; 2]>("t").unwrap_err();
        assert!(matches!(err, EmberError::FieldTypeMismatch { .. }));
    }

    #[test]
    fn test_dirty_tracking_follows_content_not_calls() {
        let mut block = block_of(&[("t", FieldKind::Float), ("tint", FieldKind::Float4)]);
        assert!(!block.is_dirty());

        // Writing the value the store already holds changes no bytes
        block.write("t", 0.0f32).unwrap();
        assert!(!block.is_dirty());

        block.write("t", 1.0f32).unwrap();
        assert!(block.is_dirty());

        block.mark_clean();
        assert!(!block.is_dirty());
        // Still clean on a second check with nothing written in between
        assert!(!block.is_dirty());

        block.write("tint", [1.0f32, 0.0, 0.0, 1.0]).unwrap();
        assert!(block.is_dirty());
    }

    #[test]
    fn test_container_blob_covers_all_leaves() {
        let mut mat = FieldNode::new("mat", FieldKind::Struct);
        mat.add_child("ambient", FieldKind::Float4).unwrap();
        mat.add_child("diffuse", FieldKind::Float4).unwrap();
        let desc = LayoutDesc::new().with_node(mat);

        let mut block = UniformBlock::new(&desc).unwrap();
        block.write("mat.ambient", [1.0f32, 2.0, 3.0, 4.0]).unwrap();
        block.write("mat.diffuse", [5.0f32, 6.0, 7.0, 8.0]).unwrap();

        let blob = block.field_bytes("mat").unwrap();
        assert_eq!(blob.len(), 32);
        let values: [f32; 8] = bytemuck::pod_read_unaligned(blob);
        assert_eq!(values, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_trailing_pad_stays_zeroed_and_readable() {
        let block = block_of(&[("dir", FieldKind::Float3)]);
        assert_eq!(block.bytes().len(), 16);
        assert!(block.bytes()[12..].iter().all(|&b| b == 0));
    }
}
