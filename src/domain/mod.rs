pub mod certification;
pub mod country;
pub mod feature;

pub use certification::{CertificationRecord, filter_records};
pub use country::{EditorialLabelSpec, ZoomProfile, canonical_name, label_spec, member_name, zoom_profile};
pub use feature::{Feature, FeatureCollection, Geometry, Polygon};
