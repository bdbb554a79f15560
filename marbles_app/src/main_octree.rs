//! Octree churn demo
//!
//! Stress-runs the spatial index the way a busy scene would: a population of
//! point and bounded objects is inserted, shuffled around every step, and
//! queried, with periodic summaries of what the index looks like. A handful
//! of global objects ride along to show up in every query.
//!
//! Run with `RUST_LOG=info ... octree_demo [size_exponent]`.

use astral_engine::foundation::logging;
use astral_engine::foundation::math::Vec3;
use astral_engine::spatial::{Extent, Octree, OctreeConfig};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const POINT_OBJECTS: u64 = 400;
const BOUNDED_OBJECTS: u64 = 200;
const GLOBAL_OBJECTS: u64 = 4;
const STEPS: u32 = 500;
const MOVES_PER_STEP: usize = 50;
const QUERIES_PER_STEP: usize = 20;

fn random_position(rng: &mut StdRng, half_width: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-half_width..half_width),
        rng.gen_range(-half_width..half_width),
        rng.gen_range(-half_width..half_width),
    )
}

fn main() {
    logging::init();

    let size_exponent = std::env::args()
        .nth(1)
        .map_or(6, |arg| arg.parse().expect("size exponent must be an integer"));
    let config = OctreeConfig {
        size_exponent,
        min_size_exponent: 1,
        precision: 0.25,
    };
    let mut octree: Octree<u64> = Octree::new(config).expect("invalid octree config");
    let half_width = 2.0_f32.powi(size_exponent);
    info!("octree demo over {:?}", octree.bounds());

    let mut rng = StdRng::seed_from_u64(42);

    // id -> (position, extent) mirror of what the index should contain
    let mut tracked = Vec::new();
    for id in 0..POINT_OBJECTS {
        let position = random_position(&mut rng, half_width);
        octree.insert(id, position, Extent::Point);
        tracked.push((id, position, Extent::Point));
    }
    for id in POINT_OBJECTS..POINT_OBJECTS + BOUNDED_OBJECTS {
        let position = random_position(&mut rng, half_width);
        let extent = Extent::Sphere(rng.gen_range(0.1..4.0));
        octree.insert(id, position, extent);
        tracked.push((id, position, extent));
    }
    for id in 0..GLOBAL_OBJECTS {
        octree.insert(u64::MAX - id, Vec3::zeros(), Extent::Global);
    }

    let expected = (POINT_OBJECTS + BOUNDED_OBJECTS + GLOBAL_OBJECTS) as usize;
    assert_eq!(octree.len(), expected);

    let mut desyncs = 0_u64;
    for step in 0..STEPS {
        for _ in 0..MOVES_PER_STEP {
            let slot = rng.gen_range(0..tracked.len());
            let (id, old_position, extent) = tracked[slot];
            let new_position = random_position(&mut rng, half_width);

            if !octree.move_object(id, extent, old_position, new_position) {
                // a miss here means our position mirror drifted from the index
                desyncs += 1;
                warn!("step {step}: move lost object {id}");
            }
            tracked[slot] = (id, new_position, extent);
        }

        let mut near_total = 0_usize;
        for _ in 0..QUERIES_PER_STEP {
            let probe = random_position(&mut rng, half_width);
            let near = octree.get_near(probe);
            near_total += near.len();
            // the root-level globals are on every query path
            debug_assert!(near.iter().filter(|id| **id > u64::MAX - GLOBAL_OBJECTS).count() >= GLOBAL_OBJECTS as usize);
        }

        if step % 100 == 0 {
            info!(
                "step {step}: {} objects indexed, avg {:.1} candidates per probe",
                octree.len(),
                near_total as f64 / QUERIES_PER_STEP as f64
            );
        }
    }

    // the index is derived data: every tracked object must still be found
    let survivors = octree.get_all_matching(|id| *id < POINT_OBJECTS + BOUNDED_OBJECTS);
    assert_eq!(survivors.len(), tracked.len());
    info!("done: {} objects survived {STEPS} steps, {desyncs} desyncs", survivors.len());

    octree.clear();
    assert!(octree.is_empty());
    info!("cleared index down to {} objects", octree.len());
}
