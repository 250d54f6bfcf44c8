pub mod plane;
pub mod reflect;

pub use glam::{dvec3, DVec2, DVec3};
pub use plane::Plane;
pub use reflect::{are_mirrored, reflect_through};

pub type Point2 = DVec2;
pub type Point3 = DVec3;
pub type Vector2 = DVec2;
pub type Vector3 = DVec3;
