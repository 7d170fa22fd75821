mod dynamodb;
mod ebs;
mod efs;
mod rds;

use std::fmt;
use std::sync::Arc;

use crate::config::{sdk_config, TaggerConfig};
use crate::tagger_core::ResourceApi;

use dynamodb::DynamoDbApi;
use ebs::EbsApi;
use efs::EfsApi;
use rds::RdsApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Rds,
    Ebs,
    Efs,
    DynamoDb,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Rds,
        ResourceKind::Ebs,
        ResourceKind::Efs,
        ResourceKind::DynamoDb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Rds => "rds",
            ResourceKind::Ebs => "ebs",
            ResourceKind::Efs => "efs",
            ResourceKind::DynamoDb => "dynamodb",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One provider-backed API per resource kind, each with its own region.
pub async fn build_apis(config: &TaggerConfig) -> Vec<Arc<dyn ResourceApi>> {
    let mut v: Vec<Arc<dyn ResourceApi>> = vec![];
    for kind in ResourceKind::ALL {
        let conf = sdk_config(config.region_for(kind)).await;
        match kind {
            ResourceKind::Rds => v.push(Arc::new(RdsApi::new(&conf))),
            ResourceKind::Ebs => v.push(Arc::new(EbsApi::new(&conf))),
            ResourceKind::Efs => v.push(Arc::new(EfsApi::new(&conf))),
            ResourceKind::DynamoDb => v.push(Arc::new(DynamoDbApi::new(&conf))),
        }
    }
    v
}
