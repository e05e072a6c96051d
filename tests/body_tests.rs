mod support;

use nalgebra::{Isometry3, Point3, Vector3};
use shatter::float_types::{PI, Real};
use shatter::float_types::rapier3d::prelude::{ColliderSet, RigidBodySet};
use shatter::fracture::{BodyState, FracturableBody, FractureConfig, FractureStrategy, ImpulseSettings, SurfaceMaterials};
use shatter::mesh::plane::Plane;
use shatter::mesh::vertex::Vertex;
use shatter::{Channel, Fracturable, FractureError, FragmentMesh};
use support::{approx_eq, rng, unit_cube};

fn materials() -> SurfaceMaterials<&'static str> {
    SurfaceMaterials {
        exterior: "brick",
        interior: "rubble",
    }
}

fn slab_body(config: FractureConfig) -> FracturableBody<&'static str> {
    FracturableBody::new(
        FragmentMesh::cuboid(2.0, 2.0, 0.2),
        Isometry3::identity(),
        40.0,
        config,
        materials(),
    )
}

#[test]
fn slab_breaks_into_bounded_fragments_near_the_impact() {
    for seed in 0..5 {
        let mut body = slab_body(FractureConfig {
            target_count: 8,
            impact_bias: 0.8,
            seed: Some(seed),
            ..FractureConfig::default()
        });
        let outcome = body
            .on_impact(&Point3::origin())
            .expect("valid input")
            .expect("first impact fractures");

        let count = outcome.fragments.len();
        assert!((1..=16).contains(&count), "seed {seed}: {count} fragments");
        for fragment in &outcome.fragments {
            assert!(fragment.mesh.volume() > 0.0);
            assert!(fragment.mesh.triangle_count(Channel::Exterior) > 0);
            assert!(fragment.mesh.triangle_count(Channel::Interior) > 0);
        }
        assert!(
            (outcome.total_volume() - 0.8).abs() <= 0.05 * 0.8,
            "seed {seed}: volume {}",
            outcome.total_volume()
        );
        // slivers may be lifted to the mass floor, never below the body's mass
        let floor = body.config().min_mass;
        assert!(outcome.total_mass() >= 40.0 - 1e-6);
        assert!(outcome.total_mass() <= 40.0 + count as Real * floor + 1e-6);
        assert_eq!(outcome.materials, materials());
    }
}

#[test]
fn second_impact_is_a_no_op() {
    let mut body = slab_body(FractureConfig {
        seed: Some(3),
        ..FractureConfig::default()
    });
    assert_eq!(body.state(), BodyState::Intact);
    assert!(!body.is_fractured());

    let first = body.on_impact(&Point3::new(0.3, 0.2, 0.1)).unwrap();
    assert!(first.is_some());
    assert!(body.is_fractured());

    let second = body.on_impact(&Point3::new(-0.3, 0.2, 0.1)).unwrap();
    assert!(second.is_none());
    assert_eq!(body.state(), BodyState::Fractured);
}

#[test]
fn empty_mesh_is_refused_and_body_stays_intact() {
    let empty = FragmentMesh::from_channels(Vec::new(), Vec::new(), Vec::new()).unwrap();
    let mut body = FracturableBody::new(empty, Isometry3::identity(), 1.0, FractureConfig::default(), materials());
    assert!(matches!(body.on_impact(&Point3::origin()), Err(FractureError::EmptyMesh)));
    assert_eq!(body.state(), BodyState::Intact);
}

#[test]
fn invalid_config_is_refused_and_body_stays_intact() {
    let mut body = slab_body(FractureConfig {
        impact_bias: 1.5,
        ..FractureConfig::default()
    });
    assert!(matches!(body.on_impact(&Point3::origin()), Err(FractureError::InvalidConfig(_))));
    assert!(!body.is_fractured());

    let mut body = slab_body(FractureConfig {
        target_count: 0,
        ..FractureConfig::default()
    });
    assert!(matches!(body.on_impact(&Point3::origin()), Err(FractureError::InvalidConfig(_))));
}

#[test]
fn non_finite_impact_is_refused_and_body_can_still_break() {
    for strategy in [FractureStrategy::Slice, FractureStrategy::Voronoi] {
        let mut body = slab_body(FractureConfig {
            strategy,
            seed: Some(3),
            ..FractureConfig::default()
        });
        for bad in [
            Point3::new(Real::NAN, 0.0, 0.0),
            Point3::new(0.0, Real::INFINITY, 0.0),
        ] {
            assert!(matches!(body.on_impact(&bad), Err(FractureError::NonFiniteImpact { .. })));
            assert_eq!(body.state(), BodyState::Intact);
        }

        let outcome = body.on_impact(&Point3::origin()).unwrap().unwrap();
        assert!(outcome.fragments.len() > 1);
        assert!(
            outcome
                .fragments
                .iter()
                .all(|f| f.mesh.triangle_count(Channel::Interior) > 0)
        );
    }
}

#[test]
fn out_of_range_indices_are_rejected() {
    let v = Vertex::new(Point3::origin(), Vector3::z(), nalgebra::Point2::origin());
    let result = FragmentMesh::from_channels(vec![v, v, v], vec![[0, 1, 3]], Vec::new());
    assert_eq!(result.unwrap_err(), FractureError::IndexOutOfRange { index: 3, len: 3 });
}

#[test]
fn impact_is_mapped_into_the_body_frame() {
    let pose = Isometry3::new(Vector3::new(10.0, 0.0, -2.0), Vector3::new(0.0, 0.0, PI / 2.0));
    let mut body = FracturableBody::new(
        unit_cube(),
        pose,
        1.0,
        FractureConfig {
            seed: Some(9),
            ..FractureConfig::default()
        },
        materials(),
    );
    let world = pose * Point3::new(0.25, 0.0, 0.0);
    let outcome = body.on_impact(&world).unwrap().unwrap();
    assert!((outcome.impact_local - Point3::new(0.25, 0.0, 0.0)).norm() < 1e-12);
    assert_eq!(outcome.impact_world, world);
    assert_eq!(outcome.pose, pose);
}

#[test]
fn voronoi_strategy_fractures_the_slab() {
    let mut body = slab_body(FractureConfig {
        target_count: 8,
        impact_bias: 0.8,
        strategy: FractureStrategy::Voronoi,
        seed: Some(21),
        ..FractureConfig::default()
    });
    let outcome = body.on_impact(&Point3::new(0.0, 0.0, 0.1)).unwrap().unwrap();
    assert!((1..=8).contains(&outcome.fragments.len()));
    assert!((outcome.total_volume() - 0.8).abs() < 1e-6);
    for fragment in &outcome.fragments {
        assert!(fragment.mesh.triangle_count(Channel::Exterior) > 0);
        assert!(fragment.mesh.triangle_count(Channel::Interior) > 0);
        assert!(fragment.mass >= body.config().min_mass);
    }
}

#[test]
fn swap_strategy_hands_back_the_prepared_pieces() {
    let cube = unit_cube();
    let (a, b) = cube.split(&Plane::from_normal(Vector3::y(), 0.25).unwrap()).unwrap();
    let mut body = FracturableBody::new(
        cube,
        Isometry3::identity(),
        8.0,
        FractureConfig {
            strategy: FractureStrategy::Swap(vec![a, b]),
            ..FractureConfig::default()
        },
        materials(),
    );
    let outcome = body.on_impact(&Point3::origin()).unwrap().unwrap();
    assert_eq!(outcome.fragments.len(), 2);
    let masses: Vec<Real> = outcome.fragments.iter().map(|f| f.mass).collect();
    assert!(approx_eq(masses[0], 2.0, 1e-9));
    assert!(approx_eq(masses[1], 6.0, 1e-9));
}

#[test]
fn same_seed_same_outcome() {
    let config = FractureConfig {
        target_count: 10,
        seed: Some(1234),
        ..FractureConfig::default()
    };
    let a = slab_body(config.clone()).on_impact(&Point3::origin()).unwrap().unwrap();
    let b = slab_body(config).on_impact(&Point3::origin()).unwrap().unwrap();
    assert_eq!(a.fragments.len(), b.fragments.len());
    for (x, y) in a.fragments.iter().zip(&b.fragments) {
        assert_eq!(x.mass, y.mass);
    }
}

#[test]
fn injected_random_source_is_used() {
    let make = || {
        FracturableBody::with_rng(
            unit_cube(),
            Isometry3::identity(),
            1.0,
            FractureConfig::default(),
            materials(),
            rng(77),
        )
    };
    let a = make().on_impact(&Point3::origin()).unwrap().unwrap();
    let b = make().on_impact(&Point3::origin()).unwrap().unwrap();
    assert_eq!(a.fragments.len(), b.fragments.len());
}

#[test]
fn fragments_spawn_as_rigid_bodies_moving_outward() {
    let mut body = slab_body(FractureConfig {
        target_count: 6,
        impulse: ImpulseSettings {
            magnitude: 10.0,
            radius: 5.0,
        },
        seed: Some(5),
        ..FractureConfig::default()
    });
    let impact = Point3::new(0.0, 0.0, 0.1);
    let outcome = body.on_impact(&impact).unwrap().unwrap();

    let mut bodies = RigidBodySet::new();
    let mut colliders = ColliderSet::new();
    let handles = outcome.spawn_into(&mut bodies, &mut colliders);
    assert_eq!(handles.len(), outcome.fragments.len());
    assert_eq!(colliders.len(), outcome.fragments.len());

    for (handle, fragment) in handles.iter().zip(&outcome.fragments) {
        let velocity = *bodies[*handle].linvel();
        let outward = fragment.mesh.center() - impact;
        assert!(velocity.dot(&outward) >= 0.0);
    }
}

#[test]
fn impulse_fades_to_zero_outside_the_radius() {
    let fragment = shatter::fracture::Fragment {
        mesh: unit_cube().transform(&Isometry3::translation(3.0, 0.0, 0.0)),
        mass: 2.0,
    };
    let settings = ImpulseSettings {
        magnitude: 4.0,
        radius: 2.0,
    };
    let far = fragment.impulse_velocity(&Isometry3::identity(), &settings, &Point3::origin());
    assert_eq!(far, Vector3::zeros());

    let settings = ImpulseSettings {
        magnitude: 4.0,
        radius: 6.0,
    };
    let near = fragment.impulse_velocity(&Isometry3::identity(), &settings, &Point3::origin());
    // half strength at half the radius, divided by the mass
    assert!((near - Vector3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
}
