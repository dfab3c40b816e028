pub mod bounds;
pub mod path;
pub mod projection;
pub mod scaling;
pub mod simplify;

pub use bounds::{Bounds, collect_bounds, world_bounds};
pub use path::{BuiltPath, build_path, build_simplified_path};
pub use projection::project;
pub use scaling::{CANVAS_HEIGHT, CANVAS_WIDTH, CanvasProjector};
