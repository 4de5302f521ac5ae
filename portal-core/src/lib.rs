pub mod activity;
pub mod chat;
pub mod error;
pub mod incident;
pub mod metrics;
pub mod normalize;
pub mod roles;
pub mod session;
pub mod subscribers;

pub use activity::{ActivityEntry, ActivityInput, ActivityLog, ActivityResult};
pub use error::PortalError;
pub use incident::{IncidentState, IncidentStatus, IncidentStore, IncidentTemplate, Priority};
pub use roles::{Role, RoleConfig};
pub use session::{Session, TurnToken};
