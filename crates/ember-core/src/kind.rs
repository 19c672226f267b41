//! Uniform-buffer field kinds

/// The kind of a single field in a uniform buffer layout.
///
/// Scalar, vector and matrix kinds carry a fixed storage size; `Struct` and
/// `Array` are containers that group other fields and own no storage of
/// their own. The size doubles as the kind's identity for layout purposes:
/// two kinds with the same size occupy a field interchangeably.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldKind {
    /// Sentinel for a field with no kind assigned yet
    #[default]
    None,
    /// Stored as 4 bytes, same as `Float`, by convention
    Bool,
    Float,
    Float2,
    Float3,
    Float4,
    Float3x3,
    Float4x4,
    /// Named container; children are keyed `parent.child`
    Struct,
    /// Indexed container; children are keyed `parent[index]`
    Array,
}

impl FieldKind {
    /// Storage size in bytes: `sizeof(f32)` times the component count.
    /// Containers and `None` contribute nothing.
    pub const fn size(self) -> usize {
        match self {
            FieldKind::None | FieldKind::Struct | FieldKind::Array => 0,
            FieldKind::Bool | FieldKind::Float => 4,
            FieldKind::Float2 => 8,
            FieldKind::Float3 => 12,
            FieldKind::Float4 => 16,
            FieldKind::Float3x3 => 36,
            FieldKind::Float4x4 => 64,
        }
    }

    /// Whether this kind may hold child fields
    pub const fn is_composite(self) -> bool {
        matches!(self, FieldKind::Struct | FieldKind::Array)
    }

    pub const fn type_name(self) -> &'static str {
        match self {
            FieldKind::None => "none",
            FieldKind::Bool => "bool",
            FieldKind::Float => "float",
            FieldKind::Float2 => "float2",
            FieldKind::Float3 => "float3",
            FieldKind::Float4 => "float4",
            FieldKind::Float3x3 => "float3x3",
            FieldKind::Float4x4 => "float4x4",
            FieldKind::Struct => "struct",
            FieldKind::Array => "array",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_match_component_counts() {
        assert_eq!(FieldKind::Float.size(), 4);
        assert_eq!(FieldKind::Float2.size(), 2 * 4);
        assert_eq!(FieldKind::Float3.size(), 3 * 4);
        assert_eq!(FieldKind::Float4.size(), 4 * 4);
        assert_eq!(FieldKind::Float3x3.size(), 9 * 4);
        assert_eq!(FieldKind::Float4x4.size(), 16 * 4);
    }

    #[test]
    fn test_bool_aliases_float_size() {
        assert_eq!(FieldKind::Bool.size(), FieldKind::Float.size());
    }

    #[test]
    fn test_containers_have_no_storage() {
        assert_eq!(FieldKind::Struct.size(), 0);
        assert_eq!(FieldKind::Array.size(), 0);
        assert_eq!(FieldKind::None.size(), 0);
        assert!(FieldKind::Struct.is_composite());
        assert!(FieldKind::Array.is_composite());
        assert!(!FieldKind::Float4.is_composite());
        assert!(!FieldKind::None.is_composite());
    }
}
