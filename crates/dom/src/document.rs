use indextree::{Arena, NodeId};
use smallvec::SmallVec;

/// What a tree node is.
#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

/// Data stored for each node in the arena.
#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
}

impl DomNode {
    pub fn element(tag: String) -> Self {
        Self {
            kind: NodeKind::Element { tag },
            attrs: SmallVec::new(),
        }
    }

    pub fn text(text: String) -> Self {
        Self {
            kind: NodeKind::Text { text },
            attrs: SmallVec::new(),
        }
    }

    pub fn comment(text: String) -> Self {
        Self {
            kind: NodeKind::Comment { text },
            attrs: SmallVec::new(),
        }
    }
}

/// A detached document tree.
///
/// Every node lives in one [`Arena`]; [`NodeId`]s are only meaningful for the
/// document that produced them. Moving a subtree between documents goes
/// through [`Document::adopt`], which deep-copies into the target arena.
#[derive(Debug)]
pub struct Document {
    arena: Arena<DomNode>,
    root: NodeId,
}

impl Document {
    /// Create an empty document containing only the synthetic document node.
    #[must_use]
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(DomNode::default());
        Self { arena, root }
    }

    /// Parse an HTML string into a detached document.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        crate::parser::parse(html)
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&DomNode> {
        self.arena.get(id).map(indextree::Node::get)
    }

    /// The element's tag name, or `None` for non-element nodes.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?
            .attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let Some(node) = self.arena.get_mut(id).map(indextree::Node::get_mut) else {
            return;
        };
        if let Some(entry) = node.attrs.iter_mut().find(|(attr, _)| attr == name) {
            entry.1 = value.to_owned();
        } else {
            node.attrs.push((name.to_owned(), value.to_owned()));
        }
    }

    #[must_use]
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let classes = match self.attr(id, "class") {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_owned(),
        };
        self.set_attr(id, "class", &classes);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(existing) = self.attr(id, "class") else {
            return;
        };
        let classes = existing
            .split_ascii_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(id, "class", &classes);
    }

    /// Read a single declaration out of the node's inline `style` attribute.
    #[must_use]
    pub fn style_property(&self, id: NodeId, property: &str) -> Option<String> {
        let style = self.attr(id, "style")?;
        for declaration in style.split(';') {
            if let Some((prop, value)) = declaration.split_once(':')
                && prop.trim() == property
            {
                return Some(value.trim().to_owned());
            }
        }
        None
    }

    /// Upsert a declaration in the node's inline `style` attribute.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        let mut declarations: Vec<(String, String)> = self
            .attr(id, "style")
            .map(|style| {
                style
                    .split(';')
                    .filter_map(|decl| decl.split_once(':'))
                    .map(|(prop, val)| (prop.trim().to_owned(), val.trim().to_owned()))
                    .collect()
            })
            .unwrap_or_default();
        if let Some(entry) = declarations.iter_mut().find(|(prop, _)| prop == property) {
            entry.1 = value.to_owned();
        } else {
            declarations.push((property.to_owned(), value.to_owned()));
        }
        let style = declarations
            .iter()
            .map(|(prop, val)| format!("{prop}: {val}"))
            .collect::<Vec<_>>()
            .join("; ");
        self.set_attr(id, "style", &style);
    }

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id)?.parent()
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        id.children(&self.arena).collect()
    }

    /// All element nodes, in document order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.root.descendants(&self.arena).filter(|id| {
            self.node(*id)
                .is_some_and(|node| matches!(node.kind, NodeKind::Element { .. }))
        })
    }

    /// The first element with the given tag name, in document order.
    #[must_use]
    pub fn first_element(&self, tag: &str) -> Option<NodeId> {
        self.elements().find(|id| self.tag(*id) == Some(tag))
    }

    /// The first element whose `id` attribute equals `id_value`.
    #[must_use]
    pub fn element_by_id(&self, id_value: &str) -> Option<NodeId> {
        self.elements()
            .find(|id| self.attr(*id, "id") == Some(id_value))
    }

    /// Every element carrying the given attribute, with its value, in
    /// document order.
    #[must_use]
    pub fn elements_with_attr(&self, name: &str) -> Vec<(NodeId, String)> {
        self.elements()
            .filter_map(|id| self.attr(id, name).map(|value| (id, value.to_owned())))
            .collect()
    }

    /// Concatenated text of the node's descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for descendant in id.descendants(&self.arena) {
            if let Some(DomNode {
                kind: NodeKind::Text { text },
                ..
            }) = self.node(descendant)
            {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace the node's children with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        for child in self.children(id) {
            child.remove_subtree(&mut self.arena);
        }
        let text_node = self.arena.new_node(DomNode::text(text.to_owned()));
        id.append(text_node, &mut self.arena);
    }

    /// The document title, or an empty string when no title element exists.
    #[must_use]
    pub fn title(&self) -> String {
        self.first_element("title")
            .map(|id| self.text_content(id))
            .unwrap_or_default()
    }

    /// Set the title text, creating the title element when absent.
    pub fn set_title(&mut self, title: &str) {
        if let Some(id) = self.first_element("title") {
            self.set_text(id, title);
            return;
        }
        let parent = self
            .first_element("head")
            .or_else(|| self.first_element("html"))
            .unwrap_or(self.root);
        let title_el = self.create_element(parent, "title");
        self.set_text(title_el, title);
    }

    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.first_element("head")
    }

    /// Hrefs of `link[rel="stylesheet"]` children of the document head.
    #[must_use]
    pub fn stylesheet_hrefs(&self) -> Vec<String> {
        let Some(head) = self.head() else {
            return Vec::new();
        };
        self.children(head)
            .into_iter()
            .filter_map(|id| self.stylesheet_href(id))
            .collect()
    }

    /// The stylesheet link under the head whose href equals `href`.
    #[must_use]
    pub fn stylesheet_link(&self, href: &str) -> Option<NodeId> {
        let head = self.head()?;
        self.children(head)
            .into_iter()
            .find(|id| self.stylesheet_href(*id).as_deref() == Some(href))
    }

    fn stylesheet_href(&self, id: NodeId) -> Option<String> {
        if self.tag(id) == Some("link") && self.attr(id, "rel") == Some("stylesheet") {
            return self.attr(id, "href").map(str::to_owned);
        }
        None
    }

    /// Create a child element under `parent` and return its id.
    pub fn create_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.arena.new_node(DomNode::element(tag.to_owned()));
        parent.append(node, &mut self.arena);
        node
    }

    /// Create a detached node from prebuilt data.
    pub fn create_node(&mut self, data: DomNode) -> NodeId {
        self.arena.new_node(data)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        parent.append(child, &mut self.arena);
    }

    /// Insert `new` as the immediately preceding sibling of `reference`.
    pub fn insert_before(&mut self, new: NodeId, reference: NodeId) {
        reference.insert_before(new, &mut self.arena);
    }

    /// Detach the subtree rooted at `id` from its parent, keeping it alive.
    pub fn detach(&mut self, id: NodeId) {
        id.detach(&mut self.arena);
    }

    /// Detach the subtree rooted at `id` from its parent and free it.
    pub fn remove(&mut self, id: NodeId) {
        id.remove_subtree(&mut self.arena);
    }

    /// Deep-copy a subtree from another document into this arena, detached.
    pub fn adopt(&mut self, source: &Self, node: NodeId) -> NodeId {
        let data = source.node(node).cloned().unwrap_or_default();
        let copy = self.arena.new_node(data);
        for child in source.children(node) {
            let child_copy = self.adopt(source, child);
            copy.append(child_copy, &mut self.arena);
        }
        copy
    }

    /// Adopt a subtree from another document and splice it in immediately
    /// before `reference`.
    pub fn adopt_before(&mut self, source: &Self, node: NodeId, reference: NodeId) -> NodeId {
        let copy = self.adopt(source, node);
        self.insert_before(copy, reference);
        copy
    }

    /// Move every child of `from` to the end of `to`'s child list.
    pub fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        for child in self.children(from) {
            child.detach(&mut self.arena);
            to.append(child, &mut self.arena);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
