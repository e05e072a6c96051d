//! One-shot fracturable bodies: configuration, strategy selection and the hand-off to physics.

use crate::errors::FractureError;
use crate::float_types::{
    EPSILON, Real,
    rapier3d::prelude::{ColliderBuilder, ColliderSet, RigidBodyBuilder, RigidBodyHandle, RigidBodySet},
};
use crate::mesh::FragmentMesh;
use crate::traits::Fracturable;
use log::{info, trace, warn};
use nalgebra::{Isometry3, Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub mod apportion;
pub mod recursive;
pub mod voronoi;

/// How a body is broken.
#[derive(Debug, Clone, Default)]
pub enum FractureStrategy {
    /// Recursive plane slicing of the whole mesh
    #[default]
    Slice,
    /// Voronoi partition of the broad face, extruded through the slab
    Voronoi,
    /// Replace the body with pre-broken pieces given in the body's local frame
    Swap(Vec<FragmentMesh>),
}

/// The outward push the host applies to every fragment. Not used by the geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseSettings {
    pub magnitude: Real,
    pub radius: Real,
}

impl Default for ImpulseSettings {
    fn default() -> Self {
        ImpulseSettings {
            magnitude: 5.0,
            radius: 2.0,
        }
    }
}

/// Tuning for one fracturable body.
#[derive(Debug, Clone)]
pub struct FractureConfig {
    /// Number of fragments to aim for
    pub target_count: usize,
    /// Pull of sites / cut planes toward the impact, in [0, 1]
    pub impact_bias: Real,
    /// Cut-plane jitter, in [0, 1]
    pub plane_chaos: Real,
    pub strategy: FractureStrategy,
    /// Lower bound for an apportioned fragment mass
    pub min_mass: Real,
    pub impulse: ImpulseSettings,
    /// Seed for reproducible fractures; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for FractureConfig {
    fn default() -> Self {
        FractureConfig {
            target_count: 8,
            impact_bias: 0.5,
            plane_chaos: 0.5,
            strategy: FractureStrategy::Slice,
            min_mass: apportion::DEFAULT_MIN_MASS,
            impulse: ImpulseSettings::default(),
            seed: None,
        }
    }
}

impl FractureConfig {
    /// Checks every value is inside its accepted range.
    ///
    /// ## Errors
    /// [`FractureError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<(), FractureError> {
        if self.target_count == 0 {
            return Err(FractureError::InvalidConfig("target_count must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.impact_bias) {
            return Err(FractureError::InvalidConfig(format!(
                "impact_bias must be in [0, 1], got {}",
                self.impact_bias
            )));
        }
        if !(0.0..=1.0).contains(&self.plane_chaos) {
            return Err(FractureError::InvalidConfig(format!(
                "plane_chaos must be in [0, 1], got {}",
                self.plane_chaos
            )));
        }
        if !(self.min_mass.is_finite() && self.min_mass > 0.0) {
            return Err(FractureError::InvalidConfig(format!(
                "min_mass must be positive, got {}",
                self.min_mass
            )));
        }
        if let FractureStrategy::Swap(pieces) = &self.strategy {
            if pieces.iter().all(FragmentMesh::is_empty) {
                return Err(FractureError::InvalidConfig("swap strategy needs at least one piece".into()));
            }
        }
        Ok(())
    }
}

/// Opaque material identifiers for the two surface channels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SurfaceMaterials<M> {
    pub exterior: M,
    pub interior: M,
}

/// Lifecycle of a fracturable body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState {
    Intact,
    Fractured,
}

/// One broken piece, in the body's local frame, with its share of the mass.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub mesh: FragmentMesh,
    pub mass: Real,
}

impl Fragment {
    /// Velocity change of the radial impulse from `impact` (world frame) on this
    /// fragment placed at `pose`: full strength at the impact, fading linearly to
    /// zero at `settings.radius`.
    pub fn impulse_velocity(
        &self,
        pose: &Isometry3<Real>,
        settings: &ImpulseSettings,
        impact: &Point3<Real>,
    ) -> Vector3<Real> {
        let offset = pose * self.mesh.center() - impact;
        let distance = offset.norm();
        if distance <= EPSILON || self.mass <= 0.0 {
            return Vector3::zeros();
        }
        let falloff = if settings.radius > 0.0 {
            (1.0 - distance / settings.radius).max(0.0)
        } else {
            1.0
        };
        offset / distance * (settings.magnitude * falloff / self.mass)
    }

    /// Create a Rapier rigid body + convex collider for this fragment at the
    /// body's `pose`, already moving away from `impact`.
    ///
    /// Returns `None` if the fragment is too flat for a convex hull.
    pub fn to_rigid_body(
        &self,
        rb_set: &mut RigidBodySet,
        co_set: &mut ColliderSet,
        pose: &Isometry3<Real>,
        settings: &ImpulseSettings,
        impact: &Point3<Real>,
    ) -> Option<RigidBodyHandle> {
        let shape = self.mesh.to_rapier_shape()?;

        let rb = RigidBodyBuilder::dynamic()
            .position(*pose)
            .linvel(self.impulse_velocity(pose, settings, impact))
            .build();
        let rb_handle = rb_set.insert(rb);

        let coll = ColliderBuilder::new(shape).mass(self.mass).build();
        co_set.insert_with_parent(coll, rb_handle, rb_set);

        Some(rb_handle)
    }
}

/// Everything the host needs to replace a broken body.
#[derive(Debug, Clone)]
pub struct FractureOutcome<M> {
    pub fragments: Vec<Fragment>,
    /// Pose of the broken body; fragment meshes are relative to it
    pub pose: Isometry3<Real>,
    pub impact_world: Point3<Real>,
    pub impact_local: Point3<Real>,
    pub impulse: ImpulseSettings,
    pub materials: SurfaceMaterials<M>,
}

impl<M> FractureOutcome<M> {
    /// Summed volume of all fragments.
    pub fn total_volume(&self) -> Real {
        self.fragments.iter().map(|f| f.mesh.volume()).sum()
    }

    /// Summed mass of all fragments.
    pub fn total_mass(&self) -> Real {
        self.fragments.iter().map(|f| f.mass).sum()
    }

    /// Spawns every fragment into Rapier (see [`Fragment::to_rigid_body`]).
    pub fn spawn_into(&self, rb_set: &mut RigidBodySet, co_set: &mut ColliderSet) -> Vec<RigidBodyHandle> {
        self.fragments
            .iter()
            .filter_map(|f| f.to_rigid_body(rb_set, co_set, &self.pose, &self.impulse, &self.impact_world))
            .collect()
    }
}

/// A solid that can be broken once.
#[derive(Debug, Clone)]
pub struct FracturableBody<M, R = StdRng> {
    mesh: FragmentMesh,
    pose: Isometry3<Real>,
    mass: Real,
    config: FractureConfig,
    materials: SurfaceMaterials<M>,
    state: BodyState,
    rng: R,
}

impl<M: Clone> FracturableBody<M, StdRng> {
    /// Create an intact body; randomness is seeded from `config.seed` (or entropy).
    pub fn new(
        mesh: FragmentMesh,
        pose: Isometry3<Real>,
        mass: Real,
        config: FractureConfig,
        materials: SurfaceMaterials<M>,
    ) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        FracturableBody::with_rng(mesh, pose, mass, config, materials, rng)
    }
}

impl<M: Clone, R: Rng> FracturableBody<M, R> {
    /// Create an intact body drawing randomness from `rng`.
    pub const fn with_rng(
        mesh: FragmentMesh,
        pose: Isometry3<Real>,
        mass: Real,
        config: FractureConfig,
        materials: SurfaceMaterials<M>,
        rng: R,
    ) -> Self {
        FracturableBody {
            mesh,
            pose,
            mass,
            config,
            materials,
            state: BodyState::Intact,
            rng,
        }
    }

    pub const fn state(&self) -> BodyState {
        self.state
    }

    pub const fn mesh(&self) -> &FragmentMesh {
        &self.mesh
    }

    pub const fn pose(&self) -> &Isometry3<Real> {
        &self.pose
    }

    pub const fn config(&self) -> &FractureConfig {
        &self.config
    }

    fn check_input(&self, world_point: &Point3<Real>) -> Result<(), FractureError> {
        if !world_point.iter().all(|c| c.is_finite()) {
            return Err(FractureError::NonFiniteImpact {
                x: world_point.x,
                y: world_point.y,
                z: world_point.z,
            });
        }
        if self.mesh.is_empty() {
            return Err(FractureError::EmptyMesh);
        }
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(FractureError::InvalidConfig(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        self.config.validate()
    }

    /// Runs the configured strategy; degenerate pieces are dropped.
    fn break_mesh(&mut self, local_impact: &Point3<Real>) -> Result<Vec<FragmentMesh>, FractureError> {
        let config = &self.config;
        let pieces = match &config.strategy {
            FractureStrategy::Slice => recursive::fragment(
                &mut self.rng,
                &self.mesh,
                config.target_count,
                local_impact,
                config.impact_bias,
                config.plane_chaos,
            ),
            FractureStrategy::Voronoi => voronoi::fragment(
                &mut self.rng,
                &self.mesh,
                config.target_count,
                local_impact,
                config.impact_bias,
            )?,
            FractureStrategy::Swap(pieces) => pieces.clone(),
        };

        let mut pieces: Vec<FragmentMesh> = pieces
            .into_iter()
            .filter(|p| !p.is_empty() && p.volume() > EPSILON)
            .collect();
        if pieces.is_empty() {
            pieces.push(self.mesh.clone());
        }
        Ok(pieces)
    }
}

impl<M: Clone, R: Rng> Fracturable for FracturableBody<M, R> {
    type Material = M;

    fn on_impact(
        &mut self,
        world_point: &Point3<Real>,
    ) -> Result<Option<FractureOutcome<M>>, FractureError> {
        if self.state == BodyState::Fractured {
            trace!("impact at {world_point} ignored: body already fractured");
            return Ok(None);
        }
        if let Err(error) = self.check_input(world_point) {
            warn!("impact at {world_point} rejected: {error}");
            return Err(error);
        }

        let local_impact = self.pose.inverse_transform_point(world_point);
        let meshes = self.break_mesh(&local_impact)?;
        let masses = apportion::apportion(&meshes, self.mass, self.config.min_mass);
        let fragments: Vec<Fragment> = meshes
            .into_iter()
            .zip(masses)
            .map(|(mesh, mass)| Fragment { mesh, mass })
            .collect();

        self.state = BodyState::Fractured;
        let outcome = FractureOutcome {
            fragments,
            pose: self.pose,
            impact_world: *world_point,
            impact_local: local_impact,
            impulse: self.config.impulse,
            materials: self.materials.clone(),
        };
        info!(
            "fractured body into {} fragments ({}), volume {} of {}",
            outcome.fragments.len(),
            strategy_name(&self.config.strategy),
            outcome.total_volume(),
            self.mesh.volume()
        );
        Ok(Some(outcome))
    }

    fn is_fractured(&self) -> bool {
        self.state == BodyState::Fractured
    }
}

const fn strategy_name(strategy: &FractureStrategy) -> &'static str {
    match strategy {
        FractureStrategy::Slice => "slice",
        FractureStrategy::Voronoi => "voronoi",
        FractureStrategy::Swap(_) => "swap",
    }
}
