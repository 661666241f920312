pub mod error;
pub mod http;
pub mod routes;

pub type DeploymentImpl = local_deployment::LocalDeployment;
