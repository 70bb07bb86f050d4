//! Route tree: declaration, construction-time flattening, and lookup.
//!
//! ARCHITECTURE
//! ============
//! Declarations are nested `RouteSpec`s. `RouteTable::new` walks them once in
//! declaration order and stores a flat node list with parent links, the full
//! path pattern of each node, and its effective authorization requirement.
//! Lookups never walk ancestors again.
//!
//! DESIGN
//! ======
//! - Child paths are relative to the parent; leading slashes are ignored.
//! - A node with children but no view is a wrapper and is not routable itself.
//! - When several nodes match a path, the one with more static segments wins,
//!   then the earlier declaration.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use std::collections::{BTreeMap, HashMap, HashSet};

use super::location::{Location, decode_segment, normalize_path, path_segments};
use super::view::{ViewBinding, ViewFuture, ViewKind};
use crate::error::RouteError;

/// Route parameters, keyed by the `:name` of a path segment.
pub type Params = BTreeMap<String, serde_json::Value>;

/// Per-node metadata as declared by route authors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteMeta {
    /// `Some(true)` guards this node and, unless overridden, its subtree.
    pub needs_auth: Option<bool>,
}

/// One node of a route declaration.
#[derive(Clone, Debug, Default)]
pub struct RouteSpec {
    pub path: String,
    pub name: Option<String>,
    pub meta: RouteMeta,
    pub view: ViewBinding,
    pub children: Vec<RouteSpec>,
}

impl RouteSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Self::default() }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn needs_auth(mut self, needs_auth: bool) -> Self {
        self.meta.needs_auth = Some(needs_auth);
        self
    }

    #[must_use]
    pub fn view(mut self, view: ViewBinding) -> Self {
        self.view = view;
        self
    }

    #[must_use]
    pub fn eager(self, kind: ViewKind) -> Self {
        self.view(ViewBinding::Eager(kind))
    }

    #[must_use]
    pub fn children(mut self, children: Vec<RouteSpec>) -> Self {
        self.children = children;
        self
    }
}

/// Index of a node inside its table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix(':') {
            Some(name) => Segment::Param(name.to_owned()),
            None => Segment::Static(raw.to_owned()),
        }
    }
}

/// A node after construction. Immutable.
#[derive(Debug)]
pub struct RouteNode {
    pub id: NodeId,
    pub name: Option<String>,
    /// Full path pattern, e.g. `/accounts/:id/edit`.
    pub pattern: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub view: ViewBinding,
    /// Requirement as declared on this node, if any.
    pub declared_auth: Option<bool>,
    /// Effective requirement after inheritance.
    pub needs_auth: bool,
    segments: Vec<Segment>,
}

impl RouteNode {
    pub fn is_routable(&self) -> bool {
        self.children.is_empty() || !self.view.is_none()
    }

    fn static_count(&self) -> usize {
        self.segments.iter().filter(|s| matches!(s, Segment::Static(_))).count()
    }

    fn matches(&self, parts: &[&str]) -> Option<Params> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(expected) if expected == part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), serde_json::Value::String(decode_segment(part)));
                }
            }
        }
        Some(params)
    }
}

/// Result of resolving a navigation target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    pub node: NodeId,
    /// Root-first chain ending with `node`.
    pub chain: Vec<NodeId>,
    pub name: Option<String>,
    pub params: Params,
    /// Concrete path, e.g. `/accounts/5`.
    pub path: String,
    pub needs_auth: bool,
}

/// Queryable, immutable route tree.
#[derive(Debug)]
pub struct RouteTable {
    nodes: Vec<RouteNode>,
    by_name: HashMap<String, NodeId>,
}

impl RouteTable {
    /// Flatten and validate a declaration.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidDeclaration`] for duplicate names, empty
    /// or repeated `:param` names along one path.
    pub fn new(specs: Vec<RouteSpec>) -> Result<Self, RouteError> {
        let mut table = Self { nodes: Vec::new(), by_name: HashMap::new() };
        for spec in specs {
            table.insert(spec, None)?;
        }
        Ok(table)
    }

    fn insert(&mut self, spec: RouteSpec, parent: Option<NodeId>) -> Result<NodeId, RouteError> {
        let (mut segments, inherited) = match parent {
            Some(p) => (self.nodes[p.0].segments.clone(), self.nodes[p.0].needs_auth),
            None => (Vec::new(), false),
        };
        segments.extend(path_segments(&spec.path).map(Segment::parse));
        validate_params(&segments, &spec.path)?;

        let id = NodeId(self.nodes.len());
        if let Some(name) = &spec.name {
            if self.by_name.insert(name.clone(), id).is_some() {
                return Err(RouteError::InvalidDeclaration(format!("duplicate route name {name}")));
            }
        }

        self.nodes.push(RouteNode {
            id,
            name: spec.name,
            pattern: pattern_of(&segments),
            parent,
            children: Vec::new(),
            view: spec.view,
            declared_auth: spec.meta.needs_auth,
            needs_auth: spec.meta.needs_auth.unwrap_or(inherited),
            segments,
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        for child in spec.children {
            self.insert(child, Some(id))?;
        }
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> &RouteNode {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &RouteNode> {
        self.nodes.iter()
    }

    pub fn find(&self, name: &str) -> Option<&RouteNode> {
        self.by_name.get(name).map(|id| self.node(*id))
    }

    pub fn needs_auth(&self, id: NodeId) -> bool {
        self.node(id).needs_auth
    }

    /// Root-first ancestor chain ending with `id`.
    pub fn chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut cursor = self.node(id).parent;
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.node(parent).parent;
        }
        chain.reverse();
        chain
    }

    /// Resolve a concrete path (query and fragment are ignored).
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Unresolved`] when no routable node matches.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch, RouteError> {
        let path = Location::parse(path).path;
        let parts = path_segments(&path).collect::<Vec<_>>();

        let mut best: Option<(&RouteNode, Params)> = None;
        for node in self.nodes.iter().filter(|n| n.is_routable()) {
            let Some(params) = node.matches(&parts) else {
                continue;
            };
            let better = best.as_ref().is_none_or(|(current, _)| node.static_count() > current.static_count());
            if better {
                best = Some((node, params));
            }
        }

        let (node, params) = best.ok_or(RouteError::Unresolved { path: path.clone() })?;
        Ok(self.route_match(node.id, params, path))
    }

    /// Resolve a named route with params.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownName`] or [`RouteError::MissingParam`].
    pub fn resolve_named(&self, name: &str, params: &Params) -> Result<RouteMatch, RouteError> {
        let node = self.find(name).ok_or_else(|| RouteError::UnknownName { name: name.to_owned() })?;
        let path = self.build_path(node, params)?;
        Ok(self.route_match(node.id, params.clone(), path))
    }

    /// Concrete path for a named route.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownName`] or [`RouteError::MissingParam`].
    pub fn href_for(&self, name: &str, params: &Params) -> Result<String, RouteError> {
        let node = self.find(name).ok_or_else(|| RouteError::UnknownName { name: name.to_owned() })?;
        self.build_path(node, params)
    }

    /// The view to render for a match: the deepest bound view along its chain.
    pub fn view_for(&self, matched: &RouteMatch) -> &ViewBinding {
        matched
            .chain
            .iter()
            .rev()
            .map(|id| &self.node(*id).view)
            .find(|view| !view.is_none())
            .unwrap_or(&self.node(matched.node).view)
    }

    /// Start (or join) loading the view for a match.
    pub fn load_view(&self, matched: &RouteMatch) -> ViewFuture {
        self.view_for(matched).load()
    }

    fn route_match(&self, id: NodeId, params: Params, path: String) -> RouteMatch {
        let node = self.node(id);
        RouteMatch { node: id, chain: self.chain(id), name: node.name.clone(), params, path, needs_auth: node.needs_auth }
    }

    fn build_path(&self, node: &RouteNode, params: &Params) -> Result<String, RouteError> {
        let mut parts = Vec::with_capacity(node.segments.len());
        for segment in &node.segments {
            match segment {
                Segment::Static(text) => parts.push(text.clone()),
                Segment::Param(param) => {
                    let value = params.get(param).and_then(param_text).ok_or_else(|| RouteError::MissingParam {
                        name: node.name.clone().unwrap_or_else(|| node.pattern.clone()),
                        param: param.clone(),
                    })?;
                    parts.push(urlencoding::encode(&value).into_owned());
                }
            }
        }
        Ok(normalize_path(&parts.join("/")))
    }
}

fn param_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(text) if text.is_empty() => None,
        serde_json::Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn pattern_of(segments: &[Segment]) -> String {
    let joined = segments
        .iter()
        .map(|segment| match segment {
            Segment::Static(text) => text.clone(),
            Segment::Param(name) => format!(":{name}"),
        })
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

fn validate_params(segments: &[Segment], declared: &str) -> Result<(), RouteError> {
    let mut seen = HashSet::new();
    for segment in segments {
        if let Segment::Param(name) = segment {
            if name.is_empty() {
                return Err(RouteError::InvalidDeclaration(format!("empty param name in {declared}")));
            }
            if !seen.insert(name.as_str()) {
                return Err(RouteError::InvalidDeclaration(format!("param :{name} repeated in {declared}")));
            }
        }
    }
    Ok(())
}
