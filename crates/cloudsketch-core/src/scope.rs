//! Scoped graph builder.
//!
//! [`Diagram::compose`] hands a root [`Scope`] to a closure. Nodes declared on
//! a scope belong to that scope's cluster; [`Scope::cluster`] opens a nested
//! scope for the duration of another closure, so visual nesting follows the
//! nesting of the code.
//!
//! ```
//! use cloudsketch_core::{
//!     diagram::{Diagram, DiagramSettings, EdgeStyle},
//!     kind::Service,
//! };
//!
//! let diagram = Diagram::compose(DiagramSettings::new("Web Service"), |scope| {
//!     let lb = scope.node(Service::Alb, "lb");
//!     let workers = scope.cluster("Workers", |scope| {
//!         [scope.node(Service::Ec2, "worker1"), scope.node(Service::Ec2, "worker2")]
//!     });
//!     let db = scope.node(Service::Rds, "events");
//!
//!     scope.connect(lb, workers);
//!     scope.connect_with(workers, db, EdgeStyle::labeled("writes"));
//! })
//! .unwrap();
//!
//! assert_eq!(diagram.stats().edges, 4);
//! ```

use log::debug;

use crate::{
    diagram::{Cluster, ClusterRef, Diagram, DiagramSettings, Edge, EdgeStyle, Element, Node, NodeRef},
    error::GraphError,
    identifier::Id,
    kind::NodeKind,
};

/// One endpoint or a homogeneous collection of endpoints of an edge.
///
/// Connecting collections fans out (or in): one edge per pair.
pub trait Endpoints {
    fn endpoints(&self) -> Vec<NodeRef>;
}

impl Endpoints for NodeRef {
    fn endpoints(&self) -> Vec<NodeRef> {
        vec![*self]
    }
}

impl<const N: usize> Endpoints for [NodeRef; N] {
    fn endpoints(&self) -> Vec<NodeRef> {
        self.to_vec()
    }
}

impl Endpoints for [NodeRef] {
    fn endpoints(&self) -> Vec<NodeRef> {
        self.to_vec()
    }
}

impl Endpoints for Vec<NodeRef> {
    fn endpoints(&self) -> Vec<NodeRef> {
        self.clone()
    }
}

impl<T: Endpoints + ?Sized> Endpoints for &T {
    fn endpoints(&self) -> Vec<NodeRef> {
        (**self).endpoints()
    }
}

/// Declarations collected while the compose closure runs.
#[derive(Debug, Default)]
struct Draft {
    clusters: Vec<Cluster>,
    elements: Vec<Element>,
    nodes: usize,
    reserved: Option<Id>,
}

impl Draft {
    /// Remembers the first caller-chosen id that looks generated.
    fn check_reserved(&mut self, id: Id) {
        if self.reserved.is_none() && id.is_anonymous() {
            self.reserved = Some(id);
        }
    }
}

/// A declaration scope: the diagram root or one cluster.
#[derive(Debug)]
pub struct Scope<'d> {
    draft: &'d mut Draft,
    cluster: Option<ClusterRef>,
}

impl Diagram {
    /// Builds a diagram by running `build` against its root scope, then
    /// freezes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns the first structural [`GraphError`] found, see
    /// [`Diagram::from_elements`].
    pub fn compose<F>(settings: DiagramSettings, build: F) -> Result<Diagram, GraphError>
    where
        F: FnOnce(&mut Scope<'_>),
    {
        let mut draft = Draft::default();
        build(&mut Scope {
            draft: &mut draft,
            cluster: None,
        });

        debug!(
            title = settings.title(),
            declarations = draft.elements.len();
            "Composed diagram"
        );

        if let Some(id) = draft.reserved {
            return Err(GraphError::ReservedId(id));
        }

        Diagram::from_elements(settings, draft.clusters, draft.elements)
    }
}

impl<'d> Scope<'d> {
    /// Declares a node in this scope with a generated reference.
    pub fn node(&mut self, kind: impl Into<NodeKind>, label: impl Into<String>) -> NodeRef {
        let id = Id::from_anonymous("node", self.draft.nodes);
        self.push_node(id, kind.into(), label.into())
    }

    /// Declares a node in this scope under a caller-chosen reference.
    ///
    /// Reusing a reference makes the diagram fail with
    /// [`GraphError::DuplicateNode`]. References starting with `__` belong to
    /// generated nodes and make it fail with [`GraphError::ReservedId`].
    pub fn named_node(
        &mut self,
        id: impl Into<Id>,
        kind: impl Into<NodeKind>,
        label: impl Into<String>,
    ) -> NodeRef {
        let id = id.into();
        self.draft.check_reserved(id);
        self.push_node(id, kind.into(), label.into())
    }

    fn push_node(&mut self, id: Id, kind: NodeKind, label: String) -> NodeRef {
        let node_ref = NodeRef::new(self.draft.nodes);
        self.draft.nodes += 1;
        self.draft
            .elements
            .push(Element::Node(Node::new(id, kind, label, self.cluster)));
        node_ref
    }

    /// Opens a nested cluster and runs `build` inside it.
    pub fn cluster<R, F>(&mut self, label: impl Into<String>, build: F) -> R
    where
        F: FnOnce(&mut Scope<'_>) -> R,
    {
        let id = Id::from_anonymous("cluster", self.draft.clusters.len());
        self.push_cluster(id, label.into(), build)
    }

    /// Like [`Scope::cluster`] with a caller-chosen reference.
    ///
    /// Reusing a reference makes the diagram fail with
    /// [`GraphError::DuplicateCluster`].
    pub fn named_cluster<R, F>(&mut self, id: impl Into<Id>, label: impl Into<String>, build: F) -> R
    where
        F: FnOnce(&mut Scope<'_>) -> R,
    {
        let id = id.into();
        self.draft.check_reserved(id);
        self.push_cluster(id, label.into(), build)
    }

    fn push_cluster<R, F>(&mut self, id: Id, label: String, build: F) -> R
    where
        F: FnOnce(&mut Scope<'_>) -> R,
    {
        let cluster_ref = ClusterRef::new(self.draft.clusters.len());
        self.draft
            .clusters
            .push(Cluster::new(id, label, self.cluster));

        build(&mut Scope {
            draft: &mut *self.draft,
            cluster: Some(cluster_ref),
        })
    }

    /// Connects every source to every target with unannotated edges.
    pub fn connect(&mut self, from: impl Endpoints, to: impl Endpoints) -> &mut Self {
        self.connect_with(from, to, EdgeStyle::default())
    }

    /// Connects every source to every target, sources outer and targets inner,
    /// each edge carrying `style`.
    pub fn connect_with(
        &mut self,
        from: impl Endpoints,
        to: impl Endpoints,
        style: EdgeStyle,
    ) -> &mut Self {
        let targets = to.endpoints();
        for source in from.endpoints() {
            for target in &targets {
                self.draft
                    .elements
                    .push(Element::Edge(Edge::new(source, *target, style.clone())));
            }
        }
        self
    }

    /// Starts an edge chain at `from`, as in `a -> b -> c`.
    pub fn chain(&mut self, from: impl Endpoints) -> Chain<'_, 'd> {
        let head = from.endpoints();
        Chain { scope: self, head }
    }
}

/// An edge chain; each hop connects the previous endpoints to the next.
#[derive(Debug)]
pub struct Chain<'s, 'd> {
    scope: &'s mut Scope<'d>,
    head: Vec<NodeRef>,
}

impl Chain<'_, '_> {
    pub fn to(self, next: impl Endpoints) -> Self {
        self.to_with(next, EdgeStyle::default())
    }

    pub fn to_with(self, next: impl Endpoints, style: EdgeStyle) -> Self {
        let next = next.endpoints();
        self.scope.connect_with(&self.head[..], &next[..], style);
        Chain {
            scope: self.scope,
            head: next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{diagram::DiagramStats, kind::Service};

    #[test]
    fn test_single_labeled_edge() {
        let diagram = Diagram::compose(DiagramSettings::new("Scenario"), |scope| {
            let a = scope.node(Service::Ec2, "EC2 Instance");
            let b = scope.node(Service::Rds, "Main Database");
            scope.connect_with(a, b, EdgeStyle::labeled("DB Access"));
        })
        .unwrap();

        assert_eq!(diagram.stats(), DiagramStats { nodes: 2, clusters: 0, edges: 1 });

        let edge = &diagram.edges()[0];
        assert_eq!(diagram.node(edge.source()).unwrap().label(), "EC2 Instance");
        assert_eq!(diagram.node(edge.target()).unwrap().label(), "Main Database");
        assert_eq!(edge.label(), Some("DB Access"));
    }

    #[test]
    fn test_fan_out_preserves_order() {
        let diagram = Diagram::compose(DiagramSettings::new("Fan out"), |scope| {
            let alb = scope.node(Service::Alb, "ALB");
            let instances = [
                scope.node(Service::Ec2, "EC2 Instance 1"),
                scope.node(Service::Ec2, "EC2 Instance 2"),
            ];
            scope.connect(alb, instances);
        })
        .unwrap();

        let targets: Vec<_> = diagram
            .edges()
            .iter()
            .map(|edge| diagram.node(edge.target()).unwrap().label())
            .collect();
        assert_eq!(targets, vec!["EC2 Instance 1", "EC2 Instance 2"]);
    }

    #[test]
    fn test_fan_in_and_cross_product() {
        let diagram = Diagram::compose(DiagramSettings::new("Cross"), |scope| {
            let sources = vec![scope.node(Service::Ec2, "a"), scope.node(Service::Ec2, "b")];
            let sinks = [scope.node(Service::Rds, "x"), scope.node(Service::Efs, "y")];
            scope.connect(&sources, sinks);
        })
        .unwrap();

        let pairs: Vec<_> = diagram
            .edges()
            .iter()
            .map(|edge| (edge.source().index(), edge.target().index()))
            .collect();
        assert_eq!(pairs, vec![(0, 2), (0, 3), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_chain() {
        let diagram = Diagram::compose(DiagramSettings::new("Chain"), |scope| {
            let route_table = scope.node(Service::RouteTable, "Route Table");
            let igw = scope.node(Service::InternetGateway, "Internet Gateway");
            let sendgrid = scope.node(NodeKind::custom("./sendgrid_logo.png"), "SendGrid API");
            scope
                .chain(route_table)
                .to_with(igw, EdgeStyle::labeled("Send Email"))
                .to(sendgrid);
        })
        .unwrap();

        let edges = diagram.edges();
        assert_eq!(edges.len(), 2);
        assert_eq!((edges[0].source().index(), edges[0].target().index()), (0, 1));
        assert_eq!(edges[0].label(), Some("Send Email"));
        assert_eq!((edges[1].source().index(), edges[1].target().index()), (1, 2));
        assert_eq!(edges[1].label(), None);
    }

    #[test]
    fn test_nested_clusters_own_their_nodes() {
        let diagram = Diagram::compose(DiagramSettings::new("Nested"), |scope| {
            scope.node(Service::InternetGateway, "igw");
            scope.cluster("VPC", |vpc| {
                vpc.node(Service::Alb, "alb");
                vpc.cluster("Auto Scaling Group", |asg| {
                    asg.node(Service::Ec2, "web");
                });
            });
        })
        .unwrap();

        let vpc = ClusterRef::new(0);
        let asg = ClusterRef::new(1);
        assert_eq!(diagram.cluster(asg).unwrap().parent(), Some(vpc));
        assert_eq!(diagram.cluster_nodes(vpc).collect::<Vec<_>>(), vec![NodeRef::new(1)]);
        assert_eq!(diagram.cluster_nodes(asg).collect::<Vec<_>>(), vec![NodeRef::new(2)]);
        assert_eq!(diagram.root_nodes().collect::<Vec<_>>(), vec![NodeRef::new(0)]);
    }

    #[test]
    fn test_empty_cluster_is_rejected() {
        let err = Diagram::compose(DiagramSettings::new("Empty"), |scope| {
            scope.node(Service::Ec2, "lonely");
            scope.cluster("Nothing", |_| {});
        })
        .unwrap_err();

        assert_eq!(err, GraphError::EmptyCluster("Nothing".to_string()));
    }

    #[test]
    fn test_foreign_node_ref_is_dangling() {
        let err = Diagram::compose(DiagramSettings::new("Foreign"), |scope| {
            let a = scope.node(Service::Ec2, "a");
            scope.connect(a, NodeRef::new(5));
        })
        .unwrap_err();

        assert_eq!(err, GraphError::DanglingEdge { edge: 0, node: 5 });
    }

    #[test]
    fn test_named_node_duplicate() {
        let err = Diagram::compose(DiagramSettings::new("Duplicate"), |scope| {
            scope.named_node("db", Service::Rds, "primary");
            scope.named_node("db", Service::Rds, "replica");
        })
        .unwrap_err();

        assert_eq!(err, GraphError::DuplicateNode(Id::new("db")));
    }

    #[test]
    fn test_named_cluster_duplicate() {
        let err = Diagram::compose(DiagramSettings::new("Duplicate"), |scope| {
            scope.named_cluster("rds", "RDS Cluster", |rds| {
                rds.node(Service::Rds, "primary");
            });
            scope.named_cluster("rds", "RDS Cluster", |rds| {
                rds.node(Service::Rds, "replica");
            });
        })
        .unwrap_err();

        assert_eq!(err, GraphError::DuplicateCluster(Id::new("rds")));
    }

    #[test]
    fn test_generated_looking_names_are_reserved() {
        let err = Diagram::compose(DiagramSettings::new("Reserved"), |scope| {
            scope.named_node("__node_1", Service::Ec2, "named");
            scope.node(Service::Ec2, "generated");
        })
        .unwrap_err();

        assert_eq!(err, GraphError::ReservedId(Id::new("__node_1")));

        let err = Diagram::compose(DiagramSettings::new("Reserved"), |scope| {
            scope.named_cluster("__cluster_0", "Cluster", |c| {
                c.node(Service::Ec2, "inside");
            });
        })
        .unwrap_err();

        assert_eq!(err, GraphError::ReservedId(Id::new("__cluster_0")));
    }

    #[test]
    fn test_cluster_returns_closure_value() {
        let mut inner = None;
        let diagram = Diagram::compose(DiagramSettings::new("Return"), |scope| {
            inner = Some(scope.cluster("RDS Cluster", |rds| rds.node(Service::Rds, "main")));
        })
        .unwrap();

        let node = diagram.node(inner.unwrap()).unwrap();
        assert_eq!(node.cluster(), Some(ClusterRef::new(0)));
    }
}
