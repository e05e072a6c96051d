//! Real-time **fracture** of solid meshes into convex rigid fragments.
//!
//! A [`FracturableBody`](fracture::FracturableBody) holds a closed triangle
//! mesh and breaks exactly once, on the first accepted
//! [`on_impact`](traits::Fracturable::on_impact). Two geometric strategies are
//! available, plus a plain swap for pre-broken pieces:
//! - **Slice**: recursive plane cuts, each one capping both halves
//!   ([`FragmentMesh::split`](mesh::FragmentMesh::split)), concentrated near the impact
//! - **Voronoi**: a 2D Voronoi partition of the body's broad face, every cell
//!   extruded into a prism ([`sketch::voronoi`], [`CellPolygon::extrude`](sketch::CellPolygon::extrude))
//!
//! Fragments carry an *exterior* channel (the original surface) and an
//! *interior* channel (freshly broken faces), a bounding box, a volume and a
//! mass share. Handing them to physics is left to the host; Rapier helpers are
//! provided on [`Fragment`](fracture::Fragment).
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod errors;
pub mod float_types;
pub mod fracture;
pub mod mesh;
pub mod sketch;
pub mod traits;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::FractureError;
pub use fracture::{FracturableBody, FractureConfig, FractureStrategy};
pub use mesh::{Channel, FragmentMesh};
pub use traits::Fracturable;
