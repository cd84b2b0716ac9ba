//! Property tests for the capture formula and the skill-selection wire
//! format.

use pet_battle::content::Database;
use pet_battle::effects::capture_probability;
use pet_battle::skills::{Skill, SkillType};
use proptest::prelude::*;

fn database() -> Database {
    let mut db = Database::new();
    for id in [10, 11, 12] {
        db.insert_skill(Skill::new(id, "move", 1, SkillType::Physic, 40, 0, 100, "none", "").unwrap());
    }
    db
}

proptest! {
    #[test]
    fn capture_rises_with_base_chance(a in 0.0f64..100.0, b in 0.0f64..100.0, hp in 0i32..=200, penalized: bool) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            capture_probability(low, hp, 200, penalized) <= capture_probability(high, hp, 200, penalized)
        );
    }

    #[test]
    fn capture_rises_as_hp_falls(prob in 0.0f64..100.0, a in 0i32..=200, b in 0i32..=200, penalized: bool) {
        let (low_hp, high_hp) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            capture_probability(prob, high_hp, 200, penalized) <= capture_probability(prob, low_hp, 200, penalized)
        );
    }

    #[test]
    fn capture_penalty_never_helps(prob in 0.0f64..100.0, hp in 0i32..=200) {
        prop_assert!(capture_probability(prob, hp, 200, true) <= capture_probability(prob, hp, 200, false));
    }

    #[test]
    fn pet_switch_round_trips(source in 0usize..6, target in 0usize..6, passive: bool) {
        let db = Database::new();
        let skill = Skill::pet_change(source, target, passive);
        let decoded = Skill::parse_rpc_data(&skill.to_rpc_data(), &db).unwrap();
        prop_assert_eq!(decoded.to_rpc_data(), skill.to_rpc_data());
        prop_assert_eq!(decoded.skill_type, SkillType::PetChange);
    }

    #[test]
    fn item_use_round_trips(item_id in 1i32..100_000) {
        let db = Database::new();
        let skill = Skill::item(item_id, Vec::new());
        let decoded = Skill::parse_rpc_data(&skill.to_rpc_data(), &db).unwrap();
        prop_assert_eq!(decoded.to_rpc_data(), skill.to_rpc_data());
    }

    #[test]
    fn skill_ids_round_trip(id in prop::sample::select(vec![-4, -1, 10, 11, 12])) {
        let db = database();
        let skill = match id {
            -4 => Skill::escape(),
            -1 => Skill::no_op(),
            _ => db.skill(id).unwrap(),
        };
        let decoded = Skill::parse_rpc_data(&skill.to_rpc_data(), &db).unwrap();
        prop_assert_eq!(decoded, skill);
    }
}
