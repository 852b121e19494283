//! DOT generation.
//!
//! [`to_dot`] writes a `digraph` in which root nodes come first, then each
//! cluster as a `subgraph cluster_<n>` holding its own nodes and sub-clusters,
//! then every edge in declaration order. The same diagram and configuration
//! always produce the same text.

use std::{
    fmt::Write,
    path::{Path, PathBuf},
};

use cloudsketch_core::{
    attrs::Attrs,
    diagram::{ClusterRef, Diagram, Edge, Node},
    kind::NodeKind,
};

use crate::config::{RenderConfig, StyleConfig};

/// Node height used for icon nodes, before multi-line padding.
const ICON_NODE_HEIGHT: f64 = 1.9;
/// Extra height per additional label line.
const LINE_PADDING: f64 = 0.4;

/// Escape special characters for DOT quoted strings.
pub fn escape(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn write_indent(output: &mut String, level: usize) {
    for _ in 0..level {
        output.push_str("  ");
    }
}

/// Incremental writer for DOT text.
struct DotWriter {
    output: String,
    indent: usize,
}

impl DotWriter {
    fn new(name: &str) -> Self {
        let mut output = String::with_capacity(4096);
        let _ = writeln!(output, "digraph \"{}\" {{", escape(name));
        Self { output, indent: 1 }
    }

    fn write_attrs(&mut self, attrs: &Attrs) {
        self.output.push('[');
        for (idx, (key, value)) in attrs.iter().enumerate() {
            if idx > 0 {
                self.output.push(' ');
            }
            let _ = write!(self.output, "\"{}\"=\"{}\"", escape(key), escape(value));
        }
        self.output.push(']');
    }

    /// Writes a `graph`, `node` or `edge` default statement.
    fn defaults(&mut self, kind: &str, attrs: &Attrs) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "{kind} ");
        self.write_attrs(attrs);
        self.output.push('\n');
        self
    }

    fn node(&mut self, id: &str, attrs: &Attrs) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "\"{}\" ", escape(id));
        self.write_attrs(attrs);
        self.output.push('\n');
        self
    }

    fn edge(&mut self, from: &str, to: &str, attrs: &Attrs) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = write!(self.output, "\"{}\" -> \"{}\"", escape(from), escape(to));
        if !attrs.is_empty() {
            self.output.push(' ');
            self.write_attrs(attrs);
        }
        self.output.push('\n');
        self
    }

    fn start_cluster(&mut self, index: usize, attrs: &Attrs) -> &mut Self {
        write_indent(&mut self.output, self.indent);
        let _ = writeln!(self.output, "subgraph cluster_{index} {{");
        self.indent += 1;
        self.defaults("graph", attrs)
    }

    fn end_cluster(&mut self) -> &mut Self {
        self.indent -= 1;
        write_indent(&mut self.output, self.indent);
        self.output.push_str("}\n");
        self
    }

    fn build(mut self) -> String {
        self.output.push_str("}\n");
        self.output
    }
}

/// Resolves the icon image of a node.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconResolver<'a> {
    icon_dir: Option<&'a Path>,
}

impl<'a> IconResolver<'a> {
    pub fn new(icon_dir: Option<&'a Path>) -> Self {
        Self { icon_dir }
    }

    /// Custom nodes always use their own icon. Built-in services use the icon
    /// pack when one is configured and contains the file.
    pub fn resolve(&self, kind: &NodeKind) -> Option<PathBuf> {
        match kind {
            NodeKind::Custom { icon } => Some(icon.clone()),
            NodeKind::Service(service) => {
                let path = self.icon_dir?.join(service.icon_resource());
                path.is_file().then_some(path)
            }
        }
    }
}

impl<'a> From<&'a RenderConfig> for IconResolver<'a> {
    fn from(config: &'a RenderConfig) -> Self {
        Self::new(config.icon_dir())
    }
}

fn graph_defaults(diagram: &Diagram, style: &StyleConfig) -> Attrs {
    let settings = diagram.settings();
    let mut attrs: Attrs = [
        ("pad", "2.0"),
        ("splines", "ortho"),
        ("nodesep", "0.60"),
        ("ranksep", "0.75"),
        ("fontname", style.font_name()),
        ("fontsize", "15"),
        ("fontcolor", style.font_color()),
    ]
    .into_iter()
    .collect();
    attrs
        .set("label", settings.title())
        .set("rankdir", settings.direction().rankdir());
    attrs.merged(settings.graph_attrs())
}

fn node_defaults(diagram: &Diagram, style: &StyleConfig) -> Attrs {
    let attrs: Attrs = [
        ("shape", "box"),
        ("style", "rounded"),
        ("fixedsize", "true"),
        ("width", "1.4"),
        ("height", "1.4"),
        ("labelloc", "b"),
        ("imagescale", "true"),
        ("fontname", style.font_name()),
        ("fontsize", "13"),
        ("fontcolor", style.font_color()),
    ]
    .into_iter()
    .collect();
    attrs.merged(diagram.settings().node_attrs())
}

fn edge_defaults(diagram: &Diagram, style: &StyleConfig) -> Attrs {
    let attrs: Attrs = [("color", style.edge_color())].into_iter().collect();
    attrs.merged(diagram.settings().edge_attrs())
}

fn cluster_attrs(diagram: &Diagram, cluster: ClusterRef, style: &StyleConfig) -> Attrs {
    let label = diagram
        .cluster(cluster)
        .map(|cluster| cluster.label())
        .unwrap_or_default();
    [
        ("label", label),
        ("shape", "box"),
        ("style", "rounded"),
        ("labeljust", "l"),
        ("pencolor", "#AEB6BE"),
        ("fontname", style.font_name()),
        ("fontsize", "12"),
        ("bgcolor", style.cluster_color(diagram.cluster_depth(cluster))),
    ]
    .into_iter()
    .collect()
}

fn node_attrs(node: &Node, icons: &IconResolver<'_>) -> Attrs {
    let mut attrs = Attrs::new();
    attrs.set("label", node.label());

    match icons.resolve(node.kind()) {
        Some(icon) => {
            let extra_lines = node.label().matches('\n').count();
            let height = ICON_NODE_HEIGHT + LINE_PADDING * extra_lines as f64;
            attrs
                .set("shape", "none")
                .set("image", icon.display().to_string())
                .set("height", format!("{height:.1}"));
        }
        None => {
            attrs
                .set("shape", node.kind().category().fallback_shape())
                .set("fixedsize", "false")
                .set("labelloc", "c");
        }
    }
    attrs
}

fn edge_attrs(edge: &Edge) -> Attrs {
    let style = edge.style();
    let mut attrs = Attrs::new();
    if let Some(label) = style.label() {
        attrs.set("label", label);
    }
    if let Some(color) = style.color() {
        attrs.set("color", color);
    }
    if let Some(line) = style.style() {
        attrs.set("style", line);
    }
    attrs
}

fn write_cluster(
    writer: &mut DotWriter,
    diagram: &Diagram,
    cluster: ClusterRef,
    style: &StyleConfig,
    icons: &IconResolver<'_>,
) {
    writer.start_cluster(cluster.index(), &cluster_attrs(diagram, cluster, style));
    for node_ref in diagram.cluster_nodes(cluster) {
        if let Some(node) = diagram.node(node_ref) {
            writer.node(&node.id().to_string(), &node_attrs(node, icons));
        }
    }
    for child in diagram.child_clusters(Some(cluster)) {
        write_cluster(writer, diagram, child, style, icons);
    }
    writer.end_cluster();
}

/// Writes the DOT description of `diagram`.
///
/// # Examples
///
/// ```
/// use cloudsketch::{
///     config::StyleConfig,
///     export::dot::{IconResolver, to_dot},
/// };
/// use cloudsketch_core::{diagram::{Diagram, DiagramSettings}, kind::Service};
///
/// let diagram = Diagram::compose(DiagramSettings::new("Tiny"), |scope| {
///     scope.named_node("web", Service::Ec2, "Web");
/// })
/// .unwrap();
///
/// let dot = to_dot(&diagram, &StyleConfig::default(), &IconResolver::default());
/// assert!(dot.starts_with("digraph \"Tiny\" {"));
/// assert!(dot.contains("\"web\" [\"label\"=\"Web\""));
/// ```
pub fn to_dot(diagram: &Diagram, style: &StyleConfig, icons: &IconResolver<'_>) -> String {
    let mut writer = DotWriter::new(diagram.title());
    writer
        .defaults("graph", &graph_defaults(diagram, style))
        .defaults("node", &node_defaults(diagram, style))
        .defaults("edge", &edge_defaults(diagram, style));

    for node_ref in diagram.root_nodes() {
        if let Some(node) = diagram.node(node_ref) {
            writer.node(&node.id().to_string(), &node_attrs(node, icons));
        }
    }

    for cluster in diagram.child_clusters(None) {
        write_cluster(&mut writer, diagram, cluster, style, icons);
    }

    for edge in diagram.edges() {
        let (Some(source), Some(target)) = (diagram.node(edge.source()), diagram.node(edge.target()))
        else {
            continue;
        };
        writer.edge(
            &source.id().to_string(),
            &target.id().to_string(),
            &edge_attrs(edge),
        );
    }

    writer.build()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use cloudsketch_core::{
        diagram::{DiagramSettings, Direction, EdgeStyle},
        kind::Service,
    };

    use super::*;

    fn render(diagram: &Diagram) -> String {
        to_dot(diagram, &StyleConfig::default(), &IconResolver::default())
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a \"b\"\nc\\d"), "a \\\"b\\\"\\nc\\\\d");
    }

    #[test]
    fn test_attribute_keys_are_quoted() {
        let diagram = Diagram::compose(
            DiagramSettings::new("Keys")
                .with_graph_attr("foo bar", "x")
                .with_graph_attr("label=\"y\" fontcolor", "red"),
            |scope| {
                scope.node(Service::Ec2, "web");
            },
        )
        .unwrap();

        let dot = render(&diagram);
        let graph_line = dot.lines().nth(1).unwrap();

        assert!(graph_line.contains("\"foo bar\"=\"x\""));
        assert!(graph_line.contains("\"label=\\\"y\\\" fontcolor\"=\"red\""));
        assert!(!graph_line.contains(" foo bar="));
    }

    #[test]
    fn test_graph_defaults_and_overrides() {
        let diagram = Diagram::compose(
            DiagramSettings::new("NSP Architecture")
                .with_direction(Direction::LeftToRight)
                .with_graph_attr("nodesep", "1.5")
                .with_graph_attr("ranksep", "1.5"),
            |scope| {
                scope.node(Service::Ec2, "web");
            },
        )
        .unwrap();

        let dot = render(&diagram);
        let graph_line = dot.lines().nth(1).unwrap();

        assert!(graph_line.trim_start().starts_with("graph [\"pad\"=\"2.0\""));
        assert!(graph_line.contains("\"nodesep\"=\"1.5\""));
        assert!(graph_line.contains("\"ranksep\"=\"1.5\""));
        assert!(graph_line.contains("\"rankdir\"=\"LR\""));
        assert!(graph_line.contains("\"label\"=\"NSP Architecture\""));
        assert!(!graph_line.contains("0.60"));
    }

    #[test]
    fn test_clusters_nest_and_color_by_depth() {
        let diagram = Diagram::compose(DiagramSettings::new("Nested"), |scope| {
            scope.cluster("VPC", |vpc| {
                vpc.named_node("alb", Service::Alb, "ALB");
                vpc.cluster("Auto Scaling Group", |asg| {
                    asg.named_node("web", Service::Ec2, "EC2 Instance 1");
                });
            });
        })
        .unwrap();

        let dot = render(&diagram);
        let vpc = dot.find("subgraph cluster_0 {").unwrap();
        let asg = dot.find("subgraph cluster_1 {").unwrap();
        let web = dot.find("\"web\" [").unwrap();

        assert!(vpc < asg && asg < web);
        assert!(dot.contains("\"bgcolor\"=\"#E5F5FD\""));
        assert!(dot.contains("\"bgcolor\"=\"#EBF3E7\""));
        assert!(dot.contains("\"label\"=\"Auto Scaling Group\""));
    }

    #[test]
    fn test_edges_with_style() {
        let diagram = Diagram::compose(DiagramSettings::new("Edges"), |scope| {
            let a = scope.named_node("a", Service::Rds, "primary");
            let b = scope.named_node("b", Service::Rds, "standby");
            scope.connect_with(
                a,
                b,
                EdgeStyle::labeled("Replication").with_style("dashed").with_color("firebrick"),
            );
            scope.connect(b, a);
        })
        .unwrap();

        let dot = render(&diagram);
        assert!(dot.contains(
            "\"a\" -> \"b\" [\"label\"=\"Replication\" \"color\"=\"firebrick\" \"style\"=\"dashed\"]"
        ));
        assert!(dot.contains("\"b\" -> \"a\"\n"));
    }

    #[test]
    fn test_fallback_shape_without_icons() {
        let diagram = Diagram::compose(DiagramSettings::new("Shapes"), |scope| {
            scope.named_node("db", Service::Rds, "Main Database");
        })
        .unwrap();

        let dot = render(&diagram);
        assert!(dot.contains("\"db\" [\"label\"=\"Main Database\" \"shape\"=\"cylinder\""));
    }

    #[test]
    fn test_custom_icon_and_multiline_height() {
        let diagram = Diagram::compose(DiagramSettings::new("Custom"), |scope| {
            scope.named_node(
                "sendgrid",
                NodeKind::custom("./sendgrid_logo.png"),
                "SendGrid\nAPI",
            );
        })
        .unwrap();

        let dot = render(&diagram);
        assert!(dot.contains("\"image\"=\"./sendgrid_logo.png\""));
        assert!(dot.contains("\"shape\"=\"none\""));
        assert!(dot.contains("\"height\"=\"2.3\""));
        assert!(dot.contains("\"label\"=\"SendGrid\\nAPI\""));
    }

    #[test]
    fn test_icon_pack_lookup() {
        let icons = tempfile::tempdir().unwrap();
        let compute = icons.path().join("aws").join("compute");
        fs::create_dir_all(&compute).unwrap();
        fs::write(compute.join("ec2.png"), b"png").unwrap();

        let resolver = IconResolver::new(Some(icons.path()));
        assert_eq!(
            resolver.resolve(&Service::Ec2.into()),
            Some(compute.join("ec2.png"))
        );
        assert_eq!(resolver.resolve(&Service::Rds.into()), None);
    }

    #[test]
    fn test_output_is_deterministic() {
        let build = || {
            Diagram::compose(DiagramSettings::new("Again"), |scope| {
                let a = scope.node(Service::Ec2, "a");
                let b = scope.cluster("C", |c| c.node(Service::Rds, "b"));
                scope.connect(a, b);
            })
            .unwrap()
        };

        assert_eq!(render(&build()), render(&build()));
    }
}
