//! The frozen diagram model.
//!
//! A [`Diagram`] is the root scope: it owns its [`DiagramSettings`] plus every
//! [`Node`], [`Cluster`] and [`Edge`] declared for it. Diagrams are built once,
//! either through [`Diagram::compose`](crate::scope) or directly from a list of
//! [`Element`]s with [`Diagram::from_elements`], and never mutated afterwards.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    str::FromStr,
};

use log::{debug, trace};
use serde::Deserialize;

use crate::{attrs::Attrs, error::GraphError, identifier::Id, kind::NodeKind};

/// Direction in which ranks are laid out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB", alias = "tb")]
    TopToBottom,
    #[serde(rename = "BT", alias = "bt")]
    BottomToTop,
    #[serde(rename = "LR", alias = "lr")]
    LeftToRight,
    #[serde(rename = "RL", alias = "rl")]
    RightToLeft,
}

impl Direction {
    /// Value of the Graphviz `rankdir` attribute.
    pub fn rankdir(self) -> &'static str {
        match self {
            Self::TopToBottom => "TB",
            Self::BottomToTop => "BT",
            Self::LeftToRight => "LR",
            Self::RightToLeft => "RL",
        }
    }
}

impl FromStr for Direction {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TB" => Ok(Self::TopToBottom),
            "BT" => Ok(Self::BottomToTop),
            "LR" => Ok(Self::LeftToRight),
            "RL" => Ok(Self::RightToLeft),
            _ => Err("Unsupported direction, expected one of TB, BT, LR, RL"),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rankdir())
    }
}

/// File format written by the renderer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
    /// The DOT description itself, without invoking a layout engine.
    Dot,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Dot => "dot",
        }
    }

    /// Whether producing this format requires a layout engine.
    pub fn is_image(self) -> bool {
        !matches!(self, Self::Dot)
    }
}

impl FromStr for OutputFormat {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            "dot" | "gv" => Ok(Self::Dot),
            _ => Err("Unsupported output format, expected one of png, jpg, svg, pdf, dot"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Rendering context of a diagram: title, direction and pass-through
/// Graphviz attributes.
///
/// # Examples
///
/// ```
/// use cloudsketch_core::diagram::{DiagramSettings, Direction};
///
/// let settings = DiagramSettings::new("NSP Architecture")
///     .with_direction(Direction::LeftToRight)
///     .with_graph_attr("splines", "ortho");
///
/// assert_eq!(settings.filename(), "nsp_architecture");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramSettings {
    title: String,
    filename: Option<String>,
    direction: Direction,
    format: OutputFormat,
    show: bool,
    graph_attrs: Attrs,
    node_attrs: Attrs,
    edge_attrs: Attrs,
}

impl DiagramSettings {
    /// Creates settings with the given title, top-to-bottom layout, PNG output
    /// and show-after-render enabled.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            filename: None,
            direction: Direction::default(),
            format: OutputFormat::default(),
            show: true,
            graph_attrs: Attrs::new(),
            node_attrs: Attrs::new(),
            edge_attrs: Attrs::new(),
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    pub fn with_graph_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.graph_attrs.set(key, value);
        self
    }

    pub fn with_graph_attrs(mut self, attrs: Attrs) -> Self {
        self.graph_attrs.extend(attrs.iter());
        self
    }

    pub fn with_node_attrs(mut self, attrs: Attrs) -> Self {
        self.node_attrs.extend(attrs.iter());
        self
    }

    pub fn with_edge_attrs(mut self, attrs: Attrs) -> Self {
        self.edge_attrs.extend(attrs.iter());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Output file stem. Defaults to the title with whitespace runs replaced
    /// by `_`, lower-cased.
    pub fn filename(&self) -> String {
        match &self.filename {
            Some(filename) => filename.clone(),
            None => self
                .title
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_")
                .to_lowercase(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn show(&self) -> bool {
        self.show
    }

    pub fn graph_attrs(&self) -> &Attrs {
        &self.graph_attrs
    }

    pub fn node_attrs(&self) -> &Attrs {
        &self.node_attrs
    }

    pub fn edge_attrs(&self) -> &Attrs {
        &self.edge_attrs
    }
}

/// Position of a node within its diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(usize);

impl NodeRef {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Position of a cluster within its diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterRef(usize);

impl ClusterRef {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// A labeled vertex depicting one architectural component.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    kind: NodeKind,
    label: String,
    cluster: Option<ClusterRef>,
}

impl Node {
    pub fn new(
        id: Id,
        kind: NodeKind,
        label: impl Into<String>,
        cluster: Option<ClusterRef>,
    ) -> Self {
        Self {
            id,
            kind,
            label: label.into(),
            cluster,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The cluster the node was declared in, `None` for the diagram root.
    pub fn cluster(&self) -> Option<ClusterRef> {
        self.cluster
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.kind)
    }
}

/// A named visual grouping of nodes and sub-clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    id: Id,
    label: String,
    parent: Option<ClusterRef>,
}

impl Cluster {
    pub fn new(id: Id, label: impl Into<String>, parent: Option<ClusterRef>) -> Self {
        Self {
            id,
            label: label.into(),
            parent,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<ClusterRef> {
        self.parent
    }
}

/// Optional annotations of an edge.
///
/// # Examples
///
/// ```
/// use cloudsketch_core::diagram::EdgeStyle;
///
/// let style = EdgeStyle::labeled("HTTPS").with_color("firebrick");
/// assert_eq!(style.label(), Some("HTTPS"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeStyle {
    label: Option<String>,
    color: Option<String>,
    style: Option<String>,
}

impl EdgeStyle {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Graphviz line style such as `dashed`, `dotted` or `bold`.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }
}

/// A directed data or traffic flow from `source` to `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: NodeRef,
    target: NodeRef,
    style: EdgeStyle,
    /// Number of nodes declared before this edge.
    nodes_before: usize,
}

impl Edge {
    pub fn new(source: NodeRef, target: NodeRef, style: EdgeStyle) -> Self {
        Self {
            source,
            target,
            style,
            nodes_before: 0,
        }
    }

    pub fn source(&self) -> NodeRef {
        self.source
    }

    pub fn target(&self) -> NodeRef {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.style.label()
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }
}

/// A declaration inside a diagram, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Node(Node),
    Edge(Edge),
}

/// Element counts of a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiagramStats {
    pub nodes: usize,
    pub clusters: usize,
    pub edges: usize,
}

impl fmt::Display for DiagramStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} clusters, {} edges",
            self.nodes, self.clusters, self.edges
        )
    }
}

/// A complete, validated diagram description.
#[derive(Debug, Clone)]
pub struct Diagram {
    settings: DiagramSettings,
    nodes: Vec<Node>,
    clusters: Vec<Cluster>,
    edges: Vec<Edge>,
    index: HashMap<Id, NodeRef>,
}

impl Diagram {
    /// Freezes a diagram from its clusters and its node/edge declarations in
    /// source order.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DanglingEdge`] if an edge names a node declared after
    ///   it, or one that does not exist.
    /// - [`GraphError::DuplicateNode`] if two nodes share an [`Id`].
    /// - [`GraphError::DuplicateCluster`] if two clusters share an [`Id`].
    /// - [`GraphError::UnknownCluster`] if a node or cluster refers to a
    ///   cluster that is not declared before it.
    /// - [`GraphError::EmptyCluster`] if a cluster ends up without members.
    pub fn from_elements(
        settings: DiagramSettings,
        clusters: Vec<Cluster>,
        elements: Vec<Element>,
    ) -> Result<Self, GraphError> {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        let mut index = HashMap::new();

        for element in elements {
            match element {
                Element::Node(node) => {
                    let node_ref = NodeRef(nodes.len());
                    if index.insert(node.id, node_ref).is_some() {
                        return Err(GraphError::DuplicateNode(node.id));
                    }
                    trace!(id:% = node.id, label = node.label.as_str(); "Declared node");
                    nodes.push(node);
                }
                Element::Edge(mut edge) => {
                    edge.nodes_before = nodes.len();
                    edges.push(edge);
                }
            }
        }

        let diagram = Self {
            settings,
            nodes,
            clusters,
            edges,
            index,
        };
        diagram.validate()?;

        debug!(
            title = diagram.title(),
            stats:% = diagram.stats();
            "Diagram frozen"
        );

        Ok(diagram)
    }

    /// Checks the structural invariants of the diagram.
    ///
    /// Diagrams returned by [`Diagram::from_elements`] always pass; this is
    /// exposed so callers can assert the invariants on the finished graph.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut cluster_ids = HashSet::with_capacity(self.clusters.len());
        for (idx, cluster) in self.clusters.iter().enumerate() {
            if !cluster_ids.insert(cluster.id()) {
                return Err(GraphError::DuplicateCluster(cluster.id()));
            }
            if let Some(parent) = cluster.parent {
                if parent.0 >= idx {
                    return Err(GraphError::UnknownCluster {
                        cluster: parent.0,
                        referrer: cluster.label.clone(),
                    });
                }
            }
        }

        for node in &self.nodes {
            if let Some(cluster) = node.cluster {
                if cluster.0 >= self.clusters.len() {
                    return Err(GraphError::UnknownCluster {
                        cluster: cluster.0,
                        referrer: node.label.clone(),
                    });
                }
            }
        }

        for (idx, edge) in self.edges.iter().enumerate() {
            for endpoint in [edge.source, edge.target] {
                if endpoint.0 >= edge.nodes_before {
                    return Err(GraphError::DanglingEdge {
                        edge: idx,
                        node: endpoint.0,
                    });
                }
            }
        }

        let mut members = vec![0usize; self.clusters.len()];
        for cluster in self.nodes.iter().filter_map(|node| node.cluster) {
            members[cluster.0] += 1;
        }
        for parent in self.clusters.iter().filter_map(|cluster| cluster.parent) {
            members[parent.0] += 1;
        }
        if let Some(empty) = members.iter().position(|count| *count == 0) {
            return Err(GraphError::EmptyCluster(self.clusters[empty].label.clone()));
        }

        Ok(())
    }

    pub fn settings(&self) -> &DiagramSettings {
        &self.settings
    }

    pub fn title(&self) -> &str {
        self.settings.title()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, node_ref: NodeRef) -> Option<&Node> {
        self.nodes.get(node_ref.0)
    }

    pub fn node_by_id(&self, id: Id) -> Option<NodeRef> {
        self.index.get(&id).copied()
    }

    pub fn cluster(&self, cluster_ref: ClusterRef) -> Option<&Cluster> {
        self.clusters.get(cluster_ref.0)
    }

    /// Nodes declared directly inside `cluster`, in declaration order.
    pub fn cluster_nodes(&self, cluster: ClusterRef) -> impl Iterator<Item = NodeRef> + '_ {
        self.nodes_in(Some(cluster))
    }

    /// Nodes declared at the diagram root, outside every cluster.
    pub fn root_nodes(&self) -> impl Iterator<Item = NodeRef> + '_ {
        self.nodes_in(None)
    }

    /// Clusters nested directly inside `parent` (`None` for top-level ones).
    pub fn child_clusters(
        &self,
        parent: Option<ClusterRef>,
    ) -> impl Iterator<Item = ClusterRef> + '_ {
        self.clusters
            .iter()
            .enumerate()
            .filter(move |(_, cluster)| cluster.parent == parent)
            .map(|(idx, _)| ClusterRef(idx))
    }

    /// Nesting depth of a cluster; top-level clusters have depth 0.
    pub fn cluster_depth(&self, cluster: ClusterRef) -> usize {
        let mut depth = 0;
        let mut current = self.cluster(cluster).and_then(Cluster::parent);
        while let Some(parent) = current {
            depth += 1;
            current = self.cluster(parent).and_then(Cluster::parent);
        }
        depth
    }

    pub fn stats(&self) -> DiagramStats {
        DiagramStats {
            nodes: self.nodes.len(),
            clusters: self.clusters.len(),
            edges: self.edges.len(),
        }
    }

    fn nodes_in(&self, cluster: Option<ClusterRef>) -> impl Iterator<Item = NodeRef> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, node)| node.cluster == cluster)
            .map(|(idx, _)| NodeRef(idx))
    }
}
