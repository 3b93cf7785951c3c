use proptest::prelude::*;
use quarry_blocks::{BlockRegistry, Face, FaceSelector, ModelName};

fn arb_selector() -> impl Strategy<Value = FaceSelector> {
    prop_oneof![
        Just(FaceSelector::All),
        Just(FaceSelector::Sides),
        Just(FaceSelector::X),
        Just(FaceSelector::Y),
        Just(FaceSelector::Z),
        (0usize..6).prop_map(|i| FaceSelector::Face(Face::ALL[i])),
    ]
}

proptest! {
    // The layer on each face comes from the most specific selector covering it,
    // independent of the order assignments are listed in.
    #[test]
    fn most_specific_selector_wins(sels in prop::collection::vec(arb_selector(), 1..8)) {
        let names: Vec<String> = (0..sels.len()).map(|i| format!("t{i}")).collect();
        let assignments: Vec<(FaceSelector, &str)> =
            sels.iter().copied().zip(names.iter().map(String::as_str)).collect();
        let mut reversed = assignments.clone();
        reversed.reverse();

        let mut reg = BlockRegistry::new();
        reg.insert(1, "a", ModelName::Cube, &assignments).unwrap();
        let mut reg_rev = BlockRegistry::new();
        reg_rev.insert(1, "a", ModelName::Cube, &reversed).unwrap();

        for face in 0..6 {
            let best = assignments
                .iter()
                .filter(|(s, _)| s.indices().contains(&face))
                .map(|(s, _)| s.specificity())
                .max();
            let Some(best) = best else { continue };
            let winner = reg.textures.name(
                quarry_blocks::TextureLayer(reg.get(1).unwrap().faces()[face].layer() as u16),
            ).unwrap();
            let candidates: Vec<&str> = assignments
                .iter()
                .filter(|(s, _)| s.indices().contains(&face) && s.specificity() == best)
                .map(|(_, t)| *t)
                .collect();
            prop_assert!(candidates.contains(&winner));
            let winner_rev = reg_rev.textures.name(
                quarry_blocks::TextureLayer(reg_rev.get(1).unwrap().faces()[face].layer() as u16),
            ).unwrap();
            prop_assert!(candidates.contains(&winner_rev));
        }
    }
}
