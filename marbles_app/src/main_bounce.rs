//! Bouncing marbles demo
//!
//! Headless simulation exercising the whole spatial/collision core: marbles
//! fly around a cubic arena whose floor and walls are plane patches. Each
//! step integrates positions, keeps the octree in sync with `move_object`,
//! asks it for broad-phase candidates with `get_near`, and resolves the
//! narrow-phase contacts geometrically.
//!
//! Run with `RUST_LOG=info` (or `debug` for per-contact output); pass a TOML
//! file as the first argument to override the simulation parameters.

use astral_engine::config::Config;
use astral_engine::foundation::collections::{Handle, HandleMap};
use astral_engine::foundation::logging;
use astral_engine::foundation::math::{Transform, Vec3};
use astral_engine::physics::collision::{
    contact_between, corrected_sphere_position, CollisionShape,
};
use astral_engine::spatial::{Extent, Octree, OctreeConfig};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Simulation parameters, loadable from a TOML file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SimulationConfig {
    /// Number of marbles in the arena
    marbles: usize,
    /// Simulation steps to run
    steps: u32,
    /// Fixed timestep in seconds
    dt: f32,
    /// Marble radius
    radius: f32,
    /// Octree settings; the arena walls sit at half the root width
    octree: OctreeConfig,
    /// Seed for reproducible runs
    seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            marbles: 64,
            steps: 600,
            dt: 1.0 / 60.0,
            radius: 0.5,
            octree: OctreeConfig {
                size_exponent: 5,
                min_size_exponent: 0,
                precision: 0.1,
            },
            seed: 7,
        }
    }
}

impl Config for SimulationConfig {}

/// One simulated object: a shape plus the state the engine never stores
struct Body {
    shape: CollisionShape,
    transform: Transform,
    velocity: Vec3,
}

fn main() {
    logging::init();

    let config = std::env::args().nth(1).map_or_else(SimulationConfig::default, |path| {
        SimulationConfig::load_from_file(&path).expect("failed to load simulation config")
    });
    info!("bounce demo: {config:?}");

    let mut octree: Octree<Handle> = Octree::new(config.octree).expect("invalid octree config");
    let mut bodies: HandleMap<Body> = HandleMap::default();

    // arena half-width, well inside the octree bounds
    let arena = 2.0_f32.powi(config.octree.size_exponent) * 0.5;
    let span = arena * 2.0;

    // floor plus four walls, each a bounded patch whose spans cover exactly
    // one arena face; the top stays open
    let corner = Vec3::repeat(-arena);
    let walls = [
        // floor, facing up
        (corner, Vec3::new(span, 0.0, 0.0), Vec3::new(0.0, 0.0, span)),
        // -X wall, facing +X
        (corner, Vec3::new(0.0, 0.0, span), Vec3::new(0.0, span, 0.0)),
        // +X wall, facing -X
        (Vec3::new(arena, -arena, -arena), Vec3::new(0.0, span, 0.0), Vec3::new(0.0, 0.0, span)),
        // -Z wall, facing +Z
        (corner, Vec3::new(0.0, span, 0.0), Vec3::new(span, 0.0, 0.0)),
        // +Z wall, facing -Z
        (Vec3::new(-arena, -arena, arena), Vec3::new(span, 0.0, 0.0), Vec3::new(0.0, span, 0.0)),
    ];
    for (origin, span1, span2) in walls {
        let handle = bodies.insert(Body {
            shape: CollisionShape::plane(origin, span1, span2),
            transform: Transform::identity(),
            velocity: Vec3::zeros(),
        });
        // planes are unbounded, so they skip partitioning entirely
        octree.insert(handle, Vec3::zeros(), Extent::Global);
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut marbles = Vec::with_capacity(config.marbles);
    for _ in 0..config.marbles {
        let position = Vec3::new(
            rng.gen_range(-arena * 0.8..arena * 0.8),
            rng.gen_range(-arena * 0.5..arena * 0.8),
            rng.gen_range(-arena * 0.8..arena * 0.8),
        );
        let velocity = Vec3::new(
            rng.gen_range(-4.0..4.0),
            rng.gen_range(-4.0..4.0),
            rng.gen_range(-4.0..4.0),
        );
        let handle = bodies.insert(Body {
            shape: CollisionShape::sphere(config.radius),
            transform: Transform::from_position(position),
            velocity,
        });
        octree.insert(handle, position, Extent::Sphere(config.radius));
        marbles.push(handle);
    }

    let gravity = Vec3::new(0.0, -9.81, 0.0);
    let mut total_contacts = 0_u64;

    for step in 0..config.steps {
        for &handle in &marbles {
            let (old_position, new_position) = {
                let body = &mut bodies[handle];
                let old = body.transform.position;
                body.velocity += gravity * config.dt;
                body.transform.position += body.velocity * config.dt;
                (old, body.transform.position)
            };

            let moved = octree.move_object(
                handle,
                Extent::Sphere(config.radius),
                old_position,
                new_position,
            );
            if !moved {
                // the index only desyncs if our position bookkeeping is wrong
                warn!("octree lost track of {handle:?}; reinserted at {new_position:?}");
            }

            let mut indexed_at = new_position;
            let candidates = octree.get_near_matching(new_position, |other| *other != handle);
            for other in candidates {
                let contact = {
                    let body = &bodies[handle];
                    let peer = &bodies[other];
                    contact_between(
                        &body.shape.to_world(&body.transform),
                        &peer.shape.to_world(&peer.transform),
                    )
                };
                let Some(contact) = contact else {
                    continue;
                };

                // plane hits come with span coordinates; anything outside
                // [0, 1] missed the bounded patch (e.g. out the open top)
                if matches!(bodies[other].shape, CollisionShape::Plane { .. })
                    && !((0.0..=1.0).contains(&contact.scale1)
                        && (0.0..=1.0).contains(&contact.scale2))
                {
                    continue;
                }

                total_contacts += 1;
                debug!(
                    "step {step}: {handle:?} hit {other:?} at {:?} along {:?}",
                    contact.position, contact.normal
                );

                let resolved = corrected_sphere_position(&contact, config.radius);
                let body = &mut bodies[handle];
                body.transform.position = resolved;
                // reflect the velocity about the contact normal if we are
                // still moving into the surface
                let approach = body.velocity.dot(&contact.normal);
                if approach < 0.0 {
                    body.velocity -= contact.normal * (2.0 * approach);
                }

                let corrected = body.transform.position;
                octree.move_object(handle, Extent::Sphere(config.radius), indexed_at, corrected);
                indexed_at = corrected;
            }
        }

        if step % 100 == 0 {
            info!(
                "step {step}: {} indexed objects, {total_contacts} contacts so far",
                octree.len()
            );
        }
    }

    info!(
        "done: {} marbles, {} steps, {total_contacts} contacts",
        config.marbles, config.steps
    );
}
