use crate::errors::FractureError;
use crate::float_types::Real;
use crate::fracture::FractureOutcome;
use nalgebra::Point3;

/// Something that breaks when hit.
///
/// Breaking is one-shot: the first accepted impact commits the fracture and
/// every later impact is a no-op returning `Ok(None)`.
pub trait Fracturable {
    /// Opaque per-channel surface material handed back with the fragments.
    type Material: Clone;

    /// Breaks the body at `world_point`.
    ///
    /// ## Errors
    /// Invalid input (empty mesh, out-of-range configuration) leaves the body
    /// intact and reports why.
    fn on_impact(
        &mut self,
        world_point: &Point3<Real>,
    ) -> Result<Option<FractureOutcome<Self::Material>>, FractureError>;

    /// `true` once a fracture has been committed.
    fn is_fractured(&self) -> bool;
}
