pub mod builder;
pub mod label;
pub mod viewbox;

pub use builder::{MapOptions, MapPath, MapPaths, build_map_paths};
pub use label::{LabelPlacement, place_label};
pub use viewbox::{ViewBox, view_box_for_country};
