use cloudsketch_core::{
    GraphError,
    diagram::{Diagram, DiagramSettings, EdgeStyle},
    kind::Service,
};

/// The architecture as deployed today: one EC2 host fronting a production and
/// a reporting environment, each backed by its own RDS instance.
pub fn current() -> Result<Diagram, GraphError> {
    let settings =
        DiagramSettings::new("National Schools Partnership AWS Architecture").with_show(true);

    Diagram::compose(settings, |scope| {
        let ec2_instance = scope.node(Service::Ec2, "EC2 Instance");

        let (main_rds, read_only_rds) = scope.cluster("RDS Cluster", |rds| {
            (
                rds.node(Service::Rds, "Main Database (Read/Write)"),
                rds.node(Service::Rds, "Read-Only Mirror"),
            )
        });

        let (production_app, reporting_app) = scope.cluster("Applications", |apps| {
            (
                apps.node(Service::Ec2, "Production Environment"),
                apps.node(Service::Ec2, "Reporting Environment"),
            )
        });

        scope
            .connect(ec2_instance, production_app)
            .connect(ec2_instance, reporting_app)
            .connect(production_app, main_rds)
            .connect(reporting_app, read_only_rds);

        let (nsp_website, third_party) = scope.cluster("External Connectivity", |external| {
            (
                external.node(Service::User, "NSP Website"),
                external.node(Service::Internet, "Third Party Microsites"),
            )
        });

        scope
            .connect_with(production_app, nsp_website, EdgeStyle::labeled("API"))
            .connect_with(production_app, third_party, EdgeStyle::labeled("API"));
    })
}

#[cfg(test)]
mod tests {
    use cloudsketch_core::diagram::DiagramStats;

    use super::*;

    #[test]
    fn test_counts() {
        let diagram = current().unwrap();
        assert_eq!(
            diagram.stats(),
            DiagramStats {
                nodes: 7,
                clusters: 3,
                edges: 6
            }
        );
        assert_eq!(
            diagram.settings().filename(),
            "national_schools_partnership_aws_architecture"
        );
    }

    #[test]
    fn test_api_edges_leave_production() {
        let diagram = current().unwrap();
        let api: Vec<_> = diagram
            .edges()
            .iter()
            .filter(|edge| edge.label() == Some("API"))
            .map(|edge| {
                (
                    diagram.node(edge.source()).unwrap().label(),
                    diagram.node(edge.target()).unwrap().label(),
                )
            })
            .collect();

        assert_eq!(
            api,
            vec![
                ("Production Environment", "NSP Website"),
                ("Production Environment", "Third Party Microsites"),
            ]
        );
    }
}
