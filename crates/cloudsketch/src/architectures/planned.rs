use cloudsketch_core::{
    GraphError,
    diagram::{Diagram, DiagramSettings, Direction, EdgeStyle},
    kind::{NodeKind, Service},
};

/// The planned VPC layout: WAF and ALB in front of an auto scaling group,
/// shared EFS storage, a primary/replica RDS pair, CloudWatch, ElastiCache,
/// and outbound email and marketing traffic through the internet gateway.
pub fn planned() -> Result<Diagram, GraphError> {
    let settings = DiagramSettings::new("NSP Architecture")
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
            let efs = vpc.node(Service::Efs, "EFS - Shared Storage");
            let alb = vpc.node(Service::Alb, "ALB");
            let waf = vpc.node(Service::Waf, "WAF");

            vpc.connect_with(third_party_microsites, waf, EdgeStyle::labeled("API Traffic"))
                .connect_with(client, waf, EdgeStyle::labeled("HTTPS"))
                .connect(waf, alb);

            let ec2_instances = vpc.cluster("Auto Scaling Group", |asg| {
                let instances = [
                    asg.node(Service::Ec2, "EC2 Instance 1"),
                    asg.node(Service::Ec2, "EC2 Instance 2"),
                ];
                asg.connect(alb, instances)
                    .connect(instances[0], efs)
                    .connect(instances[1], efs);
                instances
            });

            let read_replica_rds = vpc.cluster("RDS Cluster", |rds| {
                let main_rds = rds.node(Service::Rds, "Main Database (R/W)");
                let read_replica_rds = rds.node(Service::Rds, "Read Replica (R/O)");
                rds.connect_with(ec2_instances[0], main_rds, EdgeStyle::labeled("DB Access"))
                    .connect(ec2_instances[1], main_rds);
                read_replica_rds
            });

            let cloudwatch = vpc.node(Service::Cloudwatch, "CloudWatch");
            vpc.connect(ec2_instances[0], cloudwatch)
                .connect(ec2_instances[1], cloudwatch);

            let elasticache = vpc.node(Service::ElasticacheForRedis, "ElastiCache for Redis");
            vpc.connect(ec2_instances[0], elasticache);

            let reporting_app = vpc.node(Service::Ec2, "Reporting Environment");
            vpc.connect(reporting_app, read_replica_rds);

            vpc.chain(ec2_instances).to(route_table).to(igw);

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
    use cloudsketch_core::diagram::DiagramStats;

    use super::*;

    #[test]
    fn test_counts() {
        let diagram = planned().unwrap();
        assert_eq!(
            diagram.stats(),
            DiagramStats {
                nodes: 17,
                clusters: 3,
                edges: 21
            }
        );
    }

    #[test]
    fn test_settings() {
        let diagram = planned().unwrap();
        let settings = diagram.settings();

        assert_eq!(settings.direction(), Direction::LeftToRight);
        assert_eq!(settings.graph_attrs().get("splines"), Some("ortho"));
        assert_eq!(settings.graph_attrs().get("nodesep"), Some("1.5"));
        assert_eq!(settings.filename(), "nsp_architecture");
    }

    #[test]
    fn test_alb_fans_out_to_both_instances() {
        let diagram = planned().unwrap();
        let targets: Vec<_> = diagram
            .edges()
            .iter()
            .filter(|edge| diagram.node(edge.source()).unwrap().label() == "ALB")
            .map(|edge| diagram.node(edge.target()).unwrap().label())
            .collect();

        assert_eq!(targets, vec!["EC2 Instance 1", "EC2 Instance 2"]);
    }

    #[test]
    fn test_custom_nodes_sit_outside_the_vpc() {
        let diagram = planned().unwrap();
        let custom: Vec<_> = diagram
            .root_nodes()
            .filter_map(|node_ref| diagram.node(node_ref))
            .filter(|node| node.kind().custom_icon().is_some())
            .map(|node| node.label())
            .collect();

        assert_eq!(custom, vec!["SendGrid API", "Dotdigital API"]);
    }
}
