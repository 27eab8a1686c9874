pub mod activity;
pub mod deployment;
pub mod profile;
pub mod template;

pub use activity::PgActivityRecorder;
pub use deployment::PgDeploymentStore;
pub use profile::PgProfileProvider;
pub use template::PgTemplateStore;
