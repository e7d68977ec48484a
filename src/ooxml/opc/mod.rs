//! Open Packaging Conventions (OPC) writer layer.
//!
//! The package is assembled in memory as a list of [`Part`]s plus package-level
//! relationships, then serialized into a ZIP archive by [`PackageWriter`].

pub mod constants;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgwriter;
pub mod rel;

pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::Part;
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
