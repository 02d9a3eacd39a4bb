//! Camera control

mod orbit;

pub use orbit::OrbitCamera;
