pub mod activity;
pub mod context;
pub mod deployer;
pub mod error;
pub mod publisher;
pub mod renderer;
pub mod slug;
pub mod store;

pub use activity::ActivityRecorder;
pub use deployer::Deployer;
pub use error::DeployError;
pub use publisher::{CdnPublisher, PublishError, PublishMeta, Publisher};
pub use renderer::{Customizations, Rendered, Renderer};
pub use store::{DeploymentStore, ProfileProvider, StoreError, TemplateStore, UniqueKey};
