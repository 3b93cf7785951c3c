use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("{what} is not finite")]
    NonFinite { what: &'static str },
    #[error("entity extents must be positive (width {width}, height {height})")]
    NonPositiveExtent { width: f32, height: f32 },
    #[error("ray direction has zero length")]
    DegenerateDirection,
}
