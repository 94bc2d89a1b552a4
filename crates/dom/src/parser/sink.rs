use crate::document::{Document, DomNode};
use core::cell::RefCell;
use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, ExpandedName, QualName};
use indextree::NodeId;
use log::trace;
use std::borrow::Cow;
use std::rc::Rc;

/// Parse handle: the arena node plus the qualified name the tree builder
/// needs to report back through `elem_name`.
#[derive(Clone)]
pub struct ParseHandle(Rc<HandleData>);

struct HandleData {
    node: NodeId,
    name: Option<QualName>,
}

impl ParseHandle {
    fn new(node: NodeId, name: Option<QualName>) -> Self {
        Self(Rc::new(HandleData { node, name }))
    }
}

/// TreeSink that builds a [`Document`] arena directly.
pub struct DocumentSink {
    doc: RefCell<Document>,
    document_handle: ParseHandle,
}

impl DocumentSink {
    pub fn new() -> Self {
        let doc = Document::new();
        let document_handle = ParseHandle::new(doc.root(), None);
        Self {
            doc: RefCell::new(doc),
            document_handle,
        }
    }

    fn new_node(&self, data: DomNode, name: Option<QualName>) -> ParseHandle {
        let node = self.doc.borrow_mut().create_node(data);
        ParseHandle::new(node, name)
    }
}

impl TreeSink for DocumentSink {
    type Handle = ParseHandle;
    type Output = Document;
    type ElemName<'a>
        = ExpandedName<'a>
    where
        Self: 'a;

    fn finish(self) -> Document {
        self.doc.into_inner()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        trace!("parse error: {msg}");
    }

    fn get_document(&self) -> ParseHandle {
        self.document_handle.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a ParseHandle) -> ExpandedName<'a> {
        use html5ever::{local_name, namespace_url};
        static EMPTY_NS: html5ever::Namespace = namespace_url!("");
        static EMPTY_LOCAL: html5ever::LocalName = local_name!("");
        target.0.name.as_ref().map_or(
            ExpandedName {
                ns: &EMPTY_NS,
                local: &EMPTY_LOCAL,
            },
            QualName::expanded,
        )
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> ParseHandle {
        let mut data = DomNode::element(name.local.to_string());
        for attr in attrs {
            data.attrs
                .push((attr.name.local.to_string(), attr.value.to_string()));
        }
        self.new_node(data, Some(name))
    }

    fn create_comment(&self, text: StrTendril) -> ParseHandle {
        self.new_node(DomNode::comment(text.to_string()), None)
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> ParseHandle {
        self.new_node(DomNode::comment(data.to_string()), None)
    }

    fn append(&self, parent: &ParseHandle, child: NodeOrText<ParseHandle>) {
        let mut doc = self.doc.borrow_mut();
        match child {
            NodeOrText::AppendNode(node) => doc.append_child(parent.0.node, node.0.node),
            NodeOrText::AppendText(text) => {
                let node = doc.create_node(DomNode::text(text.to_string()));
                doc.append_child(parent.0.node, node);
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &ParseHandle,
        prev_element: &ParseHandle,
        child: NodeOrText<ParseHandle>,
    ) {
        let has_parent = self.doc.borrow().parent(element.0.node).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctype carries no information the router needs.
    }

    fn get_template_contents(&self, target: &ParseHandle) -> ParseHandle {
        target.clone()
    }

    fn same_node(&self, x: &ParseHandle, y: &ParseHandle) -> bool {
        x.0.node == y.0.node
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &ParseHandle, new_node: NodeOrText<ParseHandle>) {
        let mut doc = self.doc.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => node.0.node,
            NodeOrText::AppendText(text) => doc.create_node(DomNode::text(text.to_string())),
        };
        doc.insert_before(node, sibling.0.node);
    }

    fn add_attrs_if_missing(&self, target: &ParseHandle, attrs: Vec<Attribute>) {
        let mut doc = self.doc.borrow_mut();
        for attr in attrs {
            let name = attr.name.local.to_string();
            if doc.attr(target.0.node, &name).is_none() {
                doc.set_attr(target.0.node, &name, &attr.value);
            }
        }
    }

    fn remove_from_parent(&self, target: &ParseHandle) {
        // Detach only; the tree builder may re-insert the node elsewhere.
        self.doc.borrow_mut().detach(target.0.node);
    }

    fn reparent_children(&self, node: &ParseHandle, new_parent: &ParseHandle) {
        self.doc
            .borrow_mut()
            .reparent_children(node.0.node, new_parent.0.node);
    }
}
