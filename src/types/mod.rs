mod crossing;
mod layer;
mod sidewalk;
mod street;
mod table;

pub use crossing::Crossing;
pub use layer::Layer;
pub use sidewalk::{Side, Sidewalk, SidewalkAttrs, SourceSidewalk};
pub use street::Street;
pub use table::Table;
