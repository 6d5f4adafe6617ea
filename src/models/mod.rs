pub mod grid;
pub mod notation;
pub mod point;
pub mod request;

pub use grid::{Hemisphere, MgrsReference, UtmCoordinate};
pub use notation::{Axis, Notation};
pub use point::{GeoPoint, ParsedAngle};
pub use request::{ConversionRequest, FieldValue, RenderTarget, RenderedPoint};
