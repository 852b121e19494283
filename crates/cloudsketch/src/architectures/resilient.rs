use cloudsketch_core::{
    GraphError,
    diagram::{Diagram, DiagramSettings, Direction, EdgeStyle},
    kind::{NodeKind, Service},
};

/// The planned layout hardened for an availability-zone outage: one auto
/// scaling group per zone, a Multi-AZ standby for the primary database and a
/// replicated cache.
pub fn resilient() -> Result<Diagram, GraphError> {
    let settings = DiagramSettings::new("NSP Resilient Architecture")
        .with_show(true)
        .with_direction(Direction::LeftToRight)
        .with_graph_attr("splines", "ortho")
        .with_graph_attr("nodesep", "1.5")
        .with_graph_attr("ranksep", "1.5");

    Diagram::compose(settings, |scope| {
        let igw = scope.node(Service::InternetGateway, "Internet Gateway");
        let route_table = scope.node(Service::RouteTable, "Route Table");
        let third_party_microsites = scope.node(Service::Internet, "Third Party Microsites");
        let client = scope.node(Service::Client, "User Traffic");

        let read_replica_rds = scope.cluster("VPC", |vpc| {
            let waf = vpc.node(Service::Waf, "WAF");
            let alb = vpc.node(Service::Alb, "ALB");
            let efs = vpc.node(Service::Efs, "EFS - Shared Storage (Multi-AZ)");

            vpc.connect_with(third_party_microsites, waf, EdgeStyle::labeled("API Traffic"))
                .connect_with(client, waf, EdgeStyle::labeled("HTTPS"))
                .connect(waf, alb);

            let (zone_a, main_rds) = vpc.cluster("Availability Zone A", |az| {
                let instances = az.cluster("Auto Scaling Group A", |asg| {
                    [
                        asg.node(Service::Ec2, "EC2 Instance A1"),
                        asg.node(Service::Ec2, "EC2 Instance A2"),
                    ]
                });
                let main_rds = az.node(Service::Rds, "Main Database (R/W)");
                (instances, main_rds)
            });

            let (zone_b, standby_rds, read_replica_rds) =
                vpc.cluster("Availability Zone B", |az| {
                    let instances = az.cluster("Auto Scaling Group B", |asg| {
                        [
                            asg.node(Service::Ec2, "EC2 Instance B1"),
                            asg.node(Service::Ec2, "EC2 Instance B2"),
                        ]
                    });
                    let standby_rds = az.node(Service::Rds, "Standby Database (Multi-AZ)");
                    let read_replica_rds = az.node(Service::Rds, "Read Replica (R/O)");
                    (instances, standby_rds, read_replica_rds)
                });

            let instances = [zone_a[0], zone_a[1], zone_b[0], zone_b[1]];

            vpc.connect(alb, instances)
                .connect(instances, efs)
                .connect_with(instances, main_rds, EdgeStyle::labeled("DB Access"))
                .connect_with(
                    main_rds,
                    standby_rds,
                    EdgeStyle::labeled("Synchronous Replication").with_style("dashed"),
                )
                .connect_with(
                    main_rds,
                    read_replica_rds,
                    EdgeStyle::labeled("Asynchronous Replication").with_style("dashed"),
                );

            let cloudwatch = vpc.node(Service::Cloudwatch, "CloudWatch");
            vpc.connect(instances, cloudwatch);

            vpc.cluster("ElastiCache Replication Group", |cache| {
                let primary = cache.node(Service::ElasticacheForRedis, "ElastiCache Primary");
                let replica = cache.node(Service::ElasticacheForRedis, "ElastiCache Replica");
                cache
                    .connect([zone_a[0], zone_b[0]], primary)
                    .connect_with(primary, replica, EdgeStyle::labeled("Replication"));
            });

            let reporting_app = vpc.node(Service::Ec2, "Reporting Environment");
            vpc.connect(reporting_app, read_replica_rds);

            vpc.chain(instances).to(route_table).to(igw);

            read_replica_rds
        });

        let sendgrid_api = scope.node(NodeKind::custom("./sendgrid_logo.png"), "SendGrid API");
        let dotdigital_api =
            scope.node(NodeKind::custom("./dotdigital_logo.png"), "Dotdigital API");

        scope
            .chain(route_table)
            .to_with(igw, EdgeStyle::labeled("Send Email"))
            .to(sendgrid_api);
        scope
            .chain(route_table)
            .to_with(igw, EdgeStyle::labeled("Marketing Automation"))
            .to(dotdigital_api);

        let power_bi = scope.node(Service::PowerBi, "PowerBI Dashboard");
        scope.connect_with(
            read_replica_rds,
            power_bi,
            EdgeStyle::labeled("Remote Data Connection"),
        );
    })
}

#[cfg(test)]
mod tests {
    use cloudsketch_core::diagram::{ClusterRef, DiagramStats};

    use super::*;

    #[test]
    fn test_counts() {
        let diagram = resilient().unwrap();
        assert_eq!(
            diagram.stats(),
            DiagramStats {
                nodes: 21,
                clusters: 6,
                edges: 35
            }
        );
    }

    #[test]
    fn test_every_instance_reaches_the_primary() {
        let diagram = resilient().unwrap();
        let sources: Vec<_> = diagram
            .edges()
            .iter()
            .filter(|edge| edge.label() == Some("DB Access"))
            .map(|edge| diagram.node(edge.source()).unwrap().label())
            .collect();

        assert_eq!(
            sources,
            vec![
                "EC2 Instance A1",
                "EC2 Instance A2",
                "EC2 Instance B1",
                "EC2 Instance B2"
            ]
        );
    }

    #[test]
    fn test_zones_nest_inside_the_vpc() {
        let diagram = resilient().unwrap();
        let vpc = ClusterRef::new(0);
        let zones: Vec<_> = diagram
            .child_clusters(Some(vpc))
            .filter_map(|cluster| diagram.cluster(cluster))
            .map(|cluster| cluster.label())
            .collect();

        assert_eq!(
            zones,
            vec![
                "Availability Zone A",
                "Availability Zone B",
                "ElastiCache Replication Group"
            ]
        );
    }
}
