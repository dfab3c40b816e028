pub mod svg;
pub mod table;

pub use svg::{render_map, write_svg};
pub use table::{NO_DATA, render_table};
