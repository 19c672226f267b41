//! Layout descriptor trees
//!
//! A [`LayoutDesc`] is an ordered sequence of named [`FieldNode`] trees
//! describing the shape of a uniform buffer before any bytes exist.
//! Insertion order is layout order: the compiler walks the trees in
//! pre-order twice and relies on seeing the same sequence both times.

use ember_core::{EmberError, FieldKind, Result};

/// One named field in a layout descriptor tree.
///
/// Leaf kinds carry storage; `Struct` and `Array` are containers whose
/// children are stored under qualified names. The qualified name, not the
/// short name passed by the caller, is the lookup key used by the compiled
/// layout.
#[derive(Debug, Clone)]
pub struct FieldNode {
    name: String,
    kind: FieldKind,
    children: Vec<FieldNode>,
}

impl FieldNode {
    /// Create a field under its short (not yet qualified) name
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    /// The stored name: short for top-level fields, qualified for children
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn children(&self) -> &[FieldNode] {
        &self.children
    }

    /// Add a child under this field's namespace and return it, so nested
    /// containers can be built up in place.
    ///
    /// Only `Struct` and `Array` fields accept children. A `Struct` child is
    /// stored as `"<parent>.<name>"`; an `Array` child is stored as
    /// `"<parent>[<index>]"` where the index is the child count before
    /// insertion (the `name` argument is not part of an array element's key).
    pub fn add_child(
        &mut self,
        name: impl Into<String>,
        kind: FieldKind,
    ) -> Result<&mut FieldNode> {
        let qualified = match self.kind {
            FieldKind::Struct => format!("{}.{}", self.name, name.into()),
            FieldKind::Array => format!("{}[{}]", self.name, self.children.len()),
            _ => {
                return Err(EmberError::NotComposite {
                    parent: self.name.clone(),
                    kind: self.kind.type_name(),
                })
            }
        };
        let index = self.children.len();
        self.children.push(FieldNode::new(qualified, kind));
        Ok(&mut self.children[index])
    }

    /// Visit this field and its descendants in pre-order (self first, then
    /// each child in insertion order)
    pub fn visit<F: FnMut(&FieldNode)>(&self, f: &mut F) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}

/// An ordered sequence of top-level fields. Insertion order determines
/// byte layout order; the descriptor carries no other state.
#[derive(Debug, Clone, Default)]
pub struct LayoutDesc {
    nodes: Vec<FieldNode>,
}

impl LayoutDesc {
    /// Create an empty descriptor
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fully-formed top-level field
    pub fn add_node(&mut self, node: FieldNode) {
        self.nodes.push(node);
    }

    /// Builder-style [`add_node`](Self::add_node)
    pub fn with_node(mut self, node: FieldNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn nodes(&self) -> &[FieldNode] {
        &self.nodes
    }

    /// Visit every field of every tree in pre-order
    pub fn visit<F: FnMut(&FieldNode)>(&self, f: &mut F) {
        for node in &self.nodes {
            node.visit(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_children_get_dotted_names() {
        let mut material = FieldNode::new("material", FieldKind::Struct);
        material.add_child("ambient", FieldKind::Float4).unwrap();
        material.add_child("shininess", FieldKind::Float).unwrap();

        assert_eq!(material.children()[0].name(), "material.ambient");
        assert_eq!(material.children()[1].name(), "material.shininess");
    }

    #[test]
    fn test_array_children_get_bracketed_indices() {
        let mut lights = FieldNode::new("lights", FieldKind::Array);
        lights.add_child("ignored", FieldKind::Float4).unwrap();
        lights.add_child("also_ignored", FieldKind::Float4).unwrap();

        assert_eq!(lights.children()[0].name(), "lights[0]");
        assert_eq!(lights.children()[1].name(), "lights[1]");
    }

    #[test]
    fn test_nested_containers_chain_qualification() {
        let mut scene = FieldNode::new("scene", FieldKind::Struct);
        let fog = scene.add_child("fog", FieldKind::Struct).unwrap();
        fog.add_child("color", FieldKind::Float3).unwrap();

        let lights = scene.add_child("lights", FieldKind::Array).unwrap();
        let light = lights.add_child("", FieldKind::Struct).unwrap();
        light.add_child("direction", FieldKind::Float3).unwrap();

        assert_eq!(scene.children()[0].children()[0].name(), "scene.fog.color");
        assert_eq!(
            scene.children()[1].children()[0].children()[0].name(),
            "scene.lights[0].direction"
        );
    }

    #[test]
    fn test_add_child_to_scalar_is_rejected() {
        // This contract is enforced unconditionally, not as a debug assert:
        // a scalar can never carry children.
        let mut scalar = FieldNode::new("time", FieldKind::Float);
        let err = scalar.add_child("nested", FieldKind::Float).unwrap_err();
        assert!(matches!(err, EmberError::NotComposite { .. }));
        assert!(scalar.children().is_empty());
    }

    #[test]
    fn test_visit_is_preorder_in_insertion_order() {
        let mut root = FieldNode::new("a", FieldKind::Struct);
        root.add_child("b", FieldKind::Float).unwrap();
        let c = root.add_child("c", FieldKind::Struct).unwrap();
        c.add_child("d", FieldKind::Float2).unwrap();

        let desc = LayoutDesc::new()
            .with_node(root)
            .with_node(FieldNode::new("e", FieldKind::Float3));

        let mut seen = Vec::new();
        desc.visit(&mut |node| seen.push(node.name().to_string()));
        assert_eq!(seen, ["a", "a.b", "a.c", "a.c.d", "e"]);
    }
}
