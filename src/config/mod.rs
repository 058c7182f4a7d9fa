//! Configuration module

mod site;

pub use site::default_pipeline;
pub use site::ContactLink;
pub use site::LlmsConfig;
pub use site::SiteConfig;
