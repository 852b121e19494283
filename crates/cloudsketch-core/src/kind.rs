//! Node kinds: which service a node depicts and which icon it uses.
//!
//! A [`NodeKind`] is either one of the built-in [`Service`]s, grouped by
//! [`Provider`] and [`Category`], or a [`NodeKind::Custom`] node that points
//! at an icon image on disk.
//!
//! Services are addressable by qualified name (`aws.compute.EC2`) or by bare
//! class name (`EC2`). Lookups are case-insensitive.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::error::GraphError;

/// The vendor namespace a service belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Aws,
    Onprem,
    Custom,
}

impl Provider {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aws => "aws",
            Self::Onprem => "onprem",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Functional category of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Compute,
    Database,
    Network,
    Security,
    Storage,
    Management,
    Devtools,
    Analytics,
    General,
    Client,
    Vcs,
    Custom,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compute => "compute",
            Self::Database => "database",
            Self::Network => "network",
            Self::Security => "security",
            Self::Storage => "storage",
            Self::Management => "management",
            Self::Devtools => "devtools",
            Self::Analytics => "analytics",
            Self::General => "general",
            Self::Client => "client",
            Self::Vcs => "vcs",
            Self::Custom => "custom",
        }
    }

    /// Graphviz shape used when no icon is available for a node.
    pub fn fallback_shape(self) -> &'static str {
        match self {
            Self::Compute => "box3d",
            Self::Database => "cylinder",
            Self::Network => "hexagon",
            Self::Security => "octagon",
            Self::Storage => "folder",
            Self::Management => "component",
            Self::Devtools => "cds",
            Self::Analytics => "tab",
            Self::Client => "oval",
            Self::Vcs => "note",
            Self::General | Self::Custom => "box",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in services with a known icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    // aws.compute
    Ec2,
    AutoScaling,
    // aws.database
    Rds,
    ElasticacheForRedis,
    // aws.network
    Alb,
    InternetGateway,
    RouteTable,
    Vpc,
    // aws.storage
    Efs,
    // aws.management
    Cloudwatch,
    // aws.security
    Waf,
    // aws.devtools
    Codebuild,
    Codecommit,
    Codedeploy,
    // aws.general
    AwsClient,
    // onprem
    Client,
    User,
    Internet,
    Github,
    PowerBi,
}

impl Service {
    /// All services in lookup order.
    ///
    /// Bare class names resolve to the first match, so `Client` means the
    /// on-prem client rather than `aws.general.Client`.
    pub const ALL: [Service; 20] = [
        Self::Ec2,
        Self::AutoScaling,
        Self::Rds,
        Self::ElasticacheForRedis,
        Self::Alb,
        Self::InternetGateway,
        Self::RouteTable,
        Self::Vpc,
        Self::Efs,
        Self::Cloudwatch,
        Self::Waf,
        Self::Codebuild,
        Self::Codecommit,
        Self::Codedeploy,
        Self::Client,
        Self::User,
        Self::Internet,
        Self::Github,
        Self::PowerBi,
        Self::AwsClient,
    ];

    pub fn provider(self) -> Provider {
        match self {
            Self::Client | Self::User | Self::Internet | Self::Github | Self::PowerBi => {
                Provider::Onprem
            }
            _ => Provider::Aws,
        }
    }

    pub fn category(self) -> Category {
        match self {
            Self::Ec2 | Self::AutoScaling => Category::Compute,
            Self::Rds | Self::ElasticacheForRedis => Category::Database,
            Self::Alb | Self::InternetGateway | Self::RouteTable | Self::Vpc | Self::Internet => {
                Category::Network
            }
            Self::Efs => Category::Storage,
            Self::Cloudwatch => Category::Management,
            Self::Waf => Category::Security,
            Self::Codebuild | Self::Codecommit | Self::Codedeploy => Category::Devtools,
            Self::AwsClient => Category::General,
            Self::Client | Self::User => Category::Client,
            Self::Github => Category::Vcs,
            Self::PowerBi => Category::Analytics,
        }
    }

    /// Class name as written in diagram descriptions, e.g. `EC2`.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Ec2 => "EC2",
            Self::AutoScaling => "AutoScaling",
            Self::Rds => "RDS",
            Self::ElasticacheForRedis => "ElasticacheForRedis",
            Self::Alb => "ALB",
            Self::InternetGateway => "InternetGateway",
            Self::RouteTable => "RouteTable",
            Self::Vpc => "VPC",
            Self::Efs => "EFS",
            Self::Cloudwatch => "Cloudwatch",
            Self::Waf => "WAF",
            Self::Codebuild => "Codebuild",
            Self::Codecommit => "Codecommit",
            Self::Codedeploy => "Codedeploy",
            Self::AwsClient | Self::Client => "Client",
            Self::User => "User",
            Self::Internet => "Internet",
            Self::Github => "Github",
            Self::PowerBi => "PowerBI",
        }
    }

    /// Icon file name inside `<provider>/<category>/`.
    fn icon_file(self) -> &'static str {
        match self {
            Self::Ec2 => "ec2.png",
            Self::AutoScaling => "auto-scaling.png",
            Self::Rds => "rds.png",
            Self::ElasticacheForRedis => "elasticache-for-redis.png",
            Self::Alb => "elb-application-load-balancer.png",
            Self::InternetGateway => "internet-gateway.png",
            Self::RouteTable => "route-table.png",
            Self::Vpc => "vpc.png",
            Self::Efs => "elastic-file-system-efs.png",
            Self::Cloudwatch => "cloudwatch.png",
            Self::Waf => "waf.png",
            Self::Codebuild => "codebuild.png",
            Self::Codecommit => "codecommit.png",
            Self::Codedeploy => "codedeploy.png",
            Self::AwsClient | Self::Client => "client.png",
            Self::User => "user.png",
            Self::Internet => "internet.png",
            Self::Github => "github.png",
            Self::PowerBi => "powerbi.png",
        }
    }

    /// Icon path relative to an icon pack root, e.g. `aws/compute/ec2.png`.
    pub fn icon_resource(self) -> PathBuf {
        [
            self.provider().as_str(),
            self.category().as_str(),
            self.icon_file(),
        ]
        .iter()
        .collect()
    }

    /// Fully qualified name, e.g. `aws.compute.EC2`.
    pub fn qualified_name(self) -> String {
        format!(
            "{}.{}.{}",
            self.provider(),
            self.category(),
            self.class_name()
        )
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

impl FromStr for Service {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let matches = |service: &Service| {
            if name.contains('.') {
                service.qualified_name().eq_ignore_ascii_case(name)
            } else {
                service.class_name().eq_ignore_ascii_case(name)
            }
        };

        Self::ALL
            .iter()
            .copied()
            .find(matches)
            .ok_or_else(|| GraphError::UnknownKind(name.to_string()))
    }
}

/// What a node depicts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A built-in service.
    Service(Service),
    /// A node drawn with a caller-supplied icon image.
    Custom { icon: PathBuf },
}

impl NodeKind {
    /// Creates a custom-icon node kind.
    pub fn custom(icon: impl Into<PathBuf>) -> Self {
        Self::Custom { icon: icon.into() }
    }

    pub fn provider(&self) -> Provider {
        match self {
            Self::Service(service) => service.provider(),
            Self::Custom { .. } => Provider::Custom,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Service(service) => service.category(),
            Self::Custom { .. } => Category::Custom,
        }
    }

    /// The caller-supplied icon of a custom node.
    pub fn custom_icon(&self) -> Option<&Path> {
        match self {
            Self::Custom { icon } => Some(icon),
            Self::Service(_) => None,
        }
    }
}

impl From<Service> for NodeKind {
    fn from(service: Service) -> Self {
        Self::Service(service)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(service) => write!(f, "{service}"),
            Self::Custom { icon } => write!(f, "custom({})", icon.display()),
        }
    }
}
