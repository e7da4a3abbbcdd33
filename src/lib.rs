//! nekosite - static site hosting stack declaration
//!
//! Declares the nekofoundation.org hosting stack (private origin bucket,
//! TLS certificate, CDN distribution behind an origin access identity, and
//! an asset deployment action) and synthesizes it into a CloudFormation
//! template. Provisioning - creation, diffing, rollback - is entirely the
//! job of the external deployment engine that consumes the template.

pub mod assets;
pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod resources;
pub mod stack;
pub mod template;

// Re-exports for convenience
pub use assets::AssetManifest;
pub use check::{check_template, Violation};
pub use config::{PriceClass, SiteConfig};
pub use error::{SiteError, SiteResult};
pub use stack::SiteStack;
pub use template::{Resource, Template};
