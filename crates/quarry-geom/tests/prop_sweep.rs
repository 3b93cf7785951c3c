use proptest::prelude::*;
use quarry_geom::{Aabb, Vec3};

fn coord() -> impl Strategy<Value = f32> {
    (-64i32..64).prop_map(|v| v as f32 * 0.25)
}

fn extent() -> impl Strategy<Value = f32> {
    (1i32..16).prop_map(|v| v as f32 * 0.25)
}

fn arb_box() -> impl Strategy<Value = Aabb> {
    (coord(), coord(), coord(), extent(), extent(), extent()).prop_map(|(x, y, z, w, h, d)| {
        let min = Vec3::new(x, y, z);
        Aabb::new(min, min + Vec3::new(w, h, d))
    })
}

fn arb_velocity() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    // Contact times always fall inside the step
    #[test]
    fn entry_time_within_step(a in arb_box(), b in arb_box(), v in arb_velocity()) {
        if let Some(hit) = a.sweep(&b, v) {
            prop_assert!(hit.entry_time <= 1.0);
            prop_assert!(hit.normal.iter().any(|&n| n != 0));
        }
    }

    // The normal always opposes the motion on every struck axis
    #[test]
    fn normal_opposes_velocity(a in arb_box(), b in arb_box(), v in arb_velocity()) {
        if let Some(hit) = a.sweep(&b, v) {
            for axis in 0..3 {
                let n = hit.normal[axis] as f32;
                prop_assert!(n * v.axis(axis) <= 0.0);
            }
        }
    }

    // Translating both boxes together does not change the outcome
    #[test]
    fn sweep_translation_invariant(a in arb_box(), b in arb_box(), v in arb_velocity(), t in arb_velocity()) {
        let moved = a.translated(t).sweep(&b.translated(t), v);
        let base = a.sweep(&b, v);
        prop_assert_eq!(moved.is_some(), base.is_some());
        if let (Some(m), Some(o)) = (moved, base) {
            prop_assert!((m.entry_time - o.entry_time).abs() <= 1e-5);
            prop_assert_eq!(m.normal, o.normal);
        }
    }

    // Strict overlap is symmetric
    #[test]
    fn intersects_symmetric(a in arb_box(), b in arb_box()) {
        prop_assert_eq!(a.intersects(&b), b.intersects(&a));
    }
}
