//! Structural properties of composed diagrams.

use proptest::prelude::*;

use cloudsketch_core::{
    diagram::{Diagram, DiagramSettings, EdgeStyle, NodeRef},
    kind::Service,
};

/// Builds a diagram with `fan` EC2 targets behind one load balancer, grouped
/// in a cluster, each target then writing to a shared database.
fn fan_diagram(fan: usize, label: &str) -> Diagram {
    Diagram::compose(DiagramSettings::new("Fan"), |scope| {
        let alb = scope.node(Service::Alb, "ALB");
        let targets: Vec<NodeRef> = scope.cluster("Targets", |scope| {
            (0..fan)
                .map(|idx| scope.node(Service::Ec2, format!("EC2 Instance {}", idx + 1)))
                .collect()
        });
        let db = scope.node(Service::Rds, "Main Database");

        scope.connect(alb, &targets);
        scope.connect_with(&targets, db, EdgeStyle::labeled(label));
    })
    .expect("fan diagram is valid")
}

proptest! {
    #[test]
    fn fan_out_yields_one_edge_per_element(fan in 1usize..16, label in "[A-Za-z ]{0,12}") {
        let diagram = fan_diagram(fan, &label);

        prop_assert_eq!(diagram.stats().nodes, fan + 2);
        prop_assert_eq!(diagram.stats().edges, fan * 2);

        let fan_targets: Vec<usize> = diagram.edges()[..fan]
            .iter()
            .map(|edge| edge.target().index())
            .collect();
        let expected: Vec<usize> = (1..=fan).collect();
        prop_assert_eq!(fan_targets, expected);

        for edge in &diagram.edges()[fan..] {
            prop_assert_eq!(edge.label(), Some(label.as_str()));
        }
    }

    #[test]
    fn recomposing_is_deterministic(fan in 1usize..16) {
        let first = fan_diagram(fan, "writes");
        let second = fan_diagram(fan, "writes");

        prop_assert_eq!(first.stats(), second.stats());
        prop_assert_eq!(first.nodes(), second.nodes());
        prop_assert_eq!(first.edges(), second.edges());
        prop_assert_eq!(first.clusters(), second.clusters());
    }

    #[test]
    fn composed_diagrams_validate(fan in 1usize..16) {
        let diagram = fan_diagram(fan, "writes");
        prop_assert!(diagram.validate().is_ok());

        for edge in diagram.edges() {
            prop_assert!(diagram.node(edge.source()).is_some());
            prop_assert!(diagram.node(edge.target()).is_some());
        }
    }
}
