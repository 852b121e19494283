//! TOML manifests describing a diagram.
//!
//! A manifest is the declarative counterpart of [`Diagram::compose`]: the
//! same nodes, clusters and edges written as data.
//!
//! ```toml
//! title = "Web Service"
//! direction = "LR"
//!
//! [graph_attr]
//! splines = "ortho"
//!
//! [[cluster]]
//! ref = "workers"
//! label = "Workers"
//!
//! [[node]]
//! ref = "lb"
//! kind = "aws.network.ALB"
//! label = "lb"
//!
//! [[node]]
//! ref = "w1"
//! kind = "EC2"
//! label = "worker1"
//! cluster = "workers"
//!
//! [[node]]
//! ref = "w2"
//! kind = "EC2"
//! label = "worker2"
//! cluster = "workers"
//!
//! [[edge]]
//! from = "lb"
//! to = ["w1", "w2"]
//! label = "HTTP"
//! ```
//!
//! Clusters must be declared before the clusters nested in them. Every
//! `[[node]]` is declared before every `[[edge]]`. Nodes of kind `custom`
//! need an `icon` path.

use std::{collections::HashMap, ops::Range, path::PathBuf};

use log::{debug, warn};
use serde::Deserialize;
use thiserror::Error;

use cloudsketch_core::{
    GraphError,
    attrs::Attrs,
    diagram::{
        Cluster, ClusterRef, Diagram, DiagramSettings, Direction, Edge, EdgeStyle, Element, Node,
        NodeRef, OutputFormat,
    },
    identifier::Id,
    kind::{NodeKind, Service},
};

/// A manifest that cannot be turned into a diagram.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid manifest: {message}")]
    Syntax {
        message: String,
        span: Option<Range<usize>>,
    },

    #[error("node `{0}` has kind `custom` but no `icon`")]
    MissingIcon(String),

    #[error("edge references unknown node `{0}`")]
    UnknownNode(String),

    #[error("`{referrer}` references unknown cluster `{name}`")]
    UnknownCluster { name: String, referrer: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl ManifestError {
    /// Byte range of the offending text, when known.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            Self::Syntax { span, .. } => span.clone(),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ManifestError {
    fn from(err: toml::de::Error) -> Self {
        Self::Syntax {
            message: err.message().to_string(),
            span: err.span(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    title: String,
    filename: Option<String>,
    #[serde(default)]
    direction: Direction,
    format: Option<OutputFormat>,
    show: Option<bool>,
    #[serde(default)]
    graph_attr: Attrs,
    #[serde(default)]
    node_attr: Attrs,
    #[serde(default)]
    edge_attr: Attrs,
    #[serde(default, rename = "cluster")]
    clusters: Vec<ClusterDecl>,
    #[serde(default, rename = "node")]
    nodes: Vec<NodeDecl>,
    #[serde(default, rename = "edge")]
    edges: Vec<EdgeDecl>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClusterDecl {
    #[serde(rename = "ref")]
    name: String,
    label: String,
    parent: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeDecl {
    #[serde(rename = "ref")]
    name: String,
    kind: String,
    label: String,
    cluster: Option<String>,
    icon: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EdgeDecl {
    from: EndpointDecl,
    to: EndpointDecl,
    label: Option<String>,
    color: Option<String>,
    style: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EndpointDecl {
    One(String),
    Many(Vec<String>),
}

impl EndpointDecl {
    fn names(&self) -> &[String] {
        match self {
            Self::One(name) => std::slice::from_ref(name),
            Self::Many(names) => names,
        }
    }
}

/// Parses a manifest into a validated [`Diagram`].
///
/// # Errors
///
/// Returns [`ManifestError::Syntax`] for malformed TOML, the reference errors
/// of [`ManifestError`] for names that do not resolve, and
/// [`ManifestError::Graph`] for structural problems such as empty clusters.
pub fn parse(source: &str) -> Result<Diagram, ManifestError> {
    let document: Document = toml::from_str(source)?;
    debug!(
        title = document.title.as_str(),
        clusters = document.clusters.len(),
        nodes = document.nodes.len(),
        edges = document.edges.len();
        "Manifest parsed"
    );

    let settings = settings(&document);

    let mut cluster_refs: HashMap<&str, ClusterRef> = HashMap::new();
    let mut clusters = Vec::with_capacity(document.clusters.len());
    for decl in &document.clusters {
        let parent = decl
            .parent
            .as_deref()
            .map(|parent| resolve_cluster(&cluster_refs, parent, &decl.name))
            .transpose()?;
        let id = Id::new(&decl.name);
        if cluster_refs
            .insert(&decl.name, ClusterRef::new(clusters.len()))
            .is_some()
        {
            return Err(GraphError::DuplicateCluster(id).into());
        }
        clusters.push(Cluster::new(id, &decl.label, parent));
    }

    let mut node_refs: HashMap<&str, NodeRef> = HashMap::new();
    let mut elements = Vec::with_capacity(document.nodes.len() + document.edges.len());
    for (idx, decl) in document.nodes.iter().enumerate() {
        let cluster = decl
            .cluster
            .as_deref()
            .map(|cluster| resolve_cluster(&cluster_refs, cluster, &decl.name))
            .transpose()?;
        node_refs.entry(&decl.name).or_insert(NodeRef::new(idx));
        elements.push(Element::Node(Node::new(
            Id::new(&decl.name),
            node_kind(decl)?,
            &decl.label,
            cluster,
        )));
    }

    for decl in &document.edges {
        let sources = resolve_nodes(&node_refs, &decl.from)?;
        let targets = resolve_nodes(&node_refs, &decl.to)?;
        let style = edge_style(decl);

        for source in &sources {
            for target in &targets {
                elements.push(Element::Edge(Edge::new(*source, *target, style.clone())));
            }
        }
    }

    Ok(Diagram::from_elements(settings, clusters, elements)?)
}

fn settings(document: &Document) -> DiagramSettings {
    let mut settings = DiagramSettings::new(&document.title)
        .with_direction(document.direction)
        .with_graph_attrs(document.graph_attr.clone())
        .with_node_attrs(document.node_attr.clone())
        .with_edge_attrs(document.edge_attr.clone());

    if let Some(filename) = &document.filename {
        settings = settings.with_filename(filename);
    }
    if let Some(format) = document.format {
        settings = settings.with_format(format);
    }
    if let Some(show) = document.show {
        settings = settings.with_show(show);
    }
    settings
}

fn node_kind(decl: &NodeDecl) -> Result<NodeKind, ManifestError> {
    if decl.kind.eq_ignore_ascii_case("custom") {
        return decl
            .icon
            .clone()
            .map(NodeKind::custom)
            .ok_or_else(|| ManifestError::MissingIcon(decl.name.clone()));
    }

    if decl.icon.is_some() {
        warn!(node = decl.name.as_str(); "Ignoring `icon` on a node that is not custom");
    }
    let service: Service = decl.kind.parse()?;
    Ok(service.into())
}

fn edge_style(decl: &EdgeDecl) -> EdgeStyle {
    let mut style = EdgeStyle::default();
    if let Some(label) = &decl.label {
        style = style.with_label(label);
    }
    if let Some(color) = &decl.color {
        style = style.with_color(color);
    }
    if let Some(line) = &decl.style {
        style = style.with_style(line);
    }
    style
}

fn resolve_cluster(
    clusters: &HashMap<&str, ClusterRef>,
    name: &str,
    referrer: &str,
) -> Result<ClusterRef, ManifestError> {
    clusters
        .get(name)
        .copied()
        .ok_or_else(|| ManifestError::UnknownCluster {
            name: name.to_string(),
            referrer: referrer.to_string(),
        })
}

fn resolve_nodes(
    nodes: &HashMap<&str, NodeRef>,
    endpoint: &EndpointDecl,
) -> Result<Vec<NodeRef>, ManifestError> {
    endpoint
        .names()
        .iter()
        .map(|name| {
            nodes
                .get(name.as_str())
                .copied()
                .ok_or_else(|| ManifestError::UnknownNode(name.clone()))
        })
        .collect()
}
