//! Resolution pass tests: effect ordering, battle end, turn processing
//! and content loaded from tables.

use pet_battle::battle::{BattleResultState, BattleState, Unit, Weather};
use pet_battle::buffs::{Buff, BuffInfo, BuffType, CopyHandleType};
use pet_battle::content::Database;
use pet_battle::core::{BattleConfig, UnitId};
use pet_battle::effects::{
    Effect, EffectAbility, EffectResolver, EffectSource, EffectTiming, ResolverContext,
};
use pet_battle::pets::{BattlePet, Pet};
use pet_battle::skills::Skill;
use pet_battle::status::Status;

const ME: UnitId = UnitId(0);
const OP: UnitId = UnitId(1);

fn battle(config: &BattleConfig) -> BattleState {
    let pet = |id| BattlePet::new(Pet::new(id, Status::new(100.0, 80.0, 60.0, 40.0, 50.0, 100.0)), config);
    BattleState::new(Unit::new(ME, vec![pet(1)], 9), Unit::new(OP, vec![pet(2)], 9))
}

fn weather(timing: EffectTiming, code: i32) -> Effect {
    Effect::new(timing, EffectAbility::SetWeather, &format!("weather={code}"))
}

fn skill_with(effects: Vec<Effect>) -> Skill {
    Skill::no_op().with_effects(effects)
}

#[test]
fn test_acting_unit_resolves_first() {
    let config = BattleConfig::default();
    let db = Database::new();
    let ctx = ResolverContext::new(&db, &config);

    let mut state = battle(&config);
    state.my_unit.set_skill(skill_with(vec![weather(EffectTiming::OnAttack, 1)]));
    state.op_unit.set_skill(skill_with(vec![weather(EffectTiming::OnAttack, 2)]));

    assert_eq!(EffectResolver::resolve_timing(&mut state, EffectTiming::OnAttack, &ctx), 2);
    assert_eq!(state.weather, Weather::Rain);

    state.atk_unit = OP;
    assert_eq!(EffectResolver::resolve_timing(&mut state, EffectTiming::OnAttack, &ctx), 2);
    assert_eq!(state.weather, Weather::Sunny);
}

#[test]
fn test_buff_effects_follow_skill_effects() {
    let config = BattleConfig::default();
    let mut db = Database::new();
    db.insert_buff(
        BuffInfo::new(50, "Fog", BuffType::Normal, CopyHandleType::Block, -1, "none", "")
            .unwrap()
            .with_effects(vec![weather(EffectTiming::OnTurnStart, 5)]),
    );
    let ctx = ResolverContext::new(&db, &config);

    let mut state = battle(&config);
    state
        .op_unit
        .pet_mut()
        .unwrap()
        .buffs
        .add_buff(db.new_buff(50).unwrap());
    state.my_unit.set_skill(skill_with(vec![weather(EffectTiming::OnTurnStart, 3)]));

    let effects = EffectResolver::collect_effects(&state, EffectTiming::OnTurnStart);
    assert_eq!(effects.len(), 2);
    assert_eq!(effects[0].invoker, Some(ME));
    assert_eq!(effects[0].source, EffectSource::Skill(-1));
    assert_eq!(effects[1].invoker, Some(OP));
    assert_eq!(effects[1].source, EffectSource::Buff(50));

    EffectResolver::resolve_timing(&mut state, EffectTiming::OnTurnStart, &ctx);
    assert_eq!(state.weather, Weather::Mist);
    assert_eq!(state.phase, EffectTiming::OnTurnStart);
}

#[test]
fn test_timing_filters_effects() {
    let config = BattleConfig::default();
    let db = Database::new();
    let ctx = ResolverContext::new(&db, &config);

    let mut state = battle(&config);
    state.my_unit.set_skill(skill_with(vec![weather(EffectTiming::OnTurnEnd, 4)]));

    assert_eq!(EffectResolver::resolve_timing(&mut state, EffectTiming::OnAttack, &ctx), 0);
    assert_eq!(state.weather, Weather::Clear);
}

#[test]
fn test_battle_end_stops_the_pass() {
    let config = BattleConfig::default();
    let db = Database::new();
    let ctx = ResolverContext::new(&db, &config);

    let mut state = battle(&config);
    state.my_unit.set_skill(skill_with(vec![Effect::new(
        EffectTiming::OnAttack,
        EffectAbility::Win,
        "none",
    )]));
    state.op_unit.set_skill(skill_with(vec![weather(EffectTiming::OnAttack, 2)]));

    assert_eq!(EffectResolver::resolve_timing(&mut state, EffectTiming::OnAttack, &ctx), 1);
    assert_eq!(state.result.state, BattleResultState::Win);
    assert_eq!(state.weather, Weather::Clear);
}

#[test]
fn test_failed_effects_are_skipped() {
    let config = BattleConfig::default();
    let db = Database::new();
    let ctx = ResolverContext::new(&db, &config);

    let mut state = battle(&config);
    state.my_unit.set_skill(skill_with(vec![
        weather(EffectTiming::OnAttack, 77),
        weather(EffectTiming::OnAttack, 3),
    ]));

    assert_eq!(EffectResolver::resolve_timing(&mut state, EffectTiming::OnAttack, &ctx), 1);
    assert_eq!(state.weather, Weather::Sandstorm);
}

#[test]
fn test_end_turn_expires_buffs() {
    let config = BattleConfig::default();
    let mut db = Database::new();
    db.insert_buff(
        BuffInfo::new(60, "Rain dance", BuffType::TurnBased, CopyHandleType::Refresh, 2, "none", "")
            .unwrap()
            .with_effects(vec![weather(EffectTiming::OnRemoveBuff, 0)]),
    );
    let ctx = ResolverContext::new(&db, &config);

    let mut state = battle(&config);
    state.weather = Weather::Rain;
    state
        .my_unit
        .pet_mut()
        .unwrap()
        .buffs
        .add_buff(Buff::new(db.buff_info(60).unwrap(), 2, 0));
    state.my_unit.skill_system.skill_damage = 40;

    state.end_turn(&ctx);
    assert_eq!(state.turn, 1);
    assert_eq!(state.my_unit.skill_system.skill_damage, 0);
    assert_eq!(state.my_unit.pet().unwrap().buffs.get_buff(60).map(|b| b.turn), Some(1));
    assert_eq!(state.weather, Weather::Rain);

    state.end_turn(&ctx);
    assert!(state.my_unit.pet().unwrap().buffs.is_empty());
    assert_eq!(state.weather, Weather::Clear);
}

#[test]
fn test_history_feeds_last_turn_operands() {
    let config = BattleConfig::default();
    let db = Database::new();
    let ctx = ResolverContext::new(&db, &config);

    let mut state = battle(&config);
    state.op_unit.pet_mut().unwrap().hp = 90;
    EffectResolver::resolve_timing(&mut state, EffectTiming::OnTurnEnd, &ctx);
    state.end_turn(&ctx);

    state.op_unit.pet_mut().unwrap().hp = 30;
    state.my_unit.set_skill(skill_with(vec![Effect::new(
        EffectTiming::OnAttack,
        EffectAbility::SetDamage,
        "value=last.op.hp-op.hp",
    )]));
    EffectResolver::resolve_timing(&mut state, EffectTiming::OnAttack, &ctx);

    assert_eq!(state.my_unit.skill_system.skill_damage, 60);
}

#[test]
fn test_battle_from_tables() {
    let config = BattleConfig::default();
    let db = Database::from_tables(
        "# id,name,type,copy,turn,options,description\n\
         70,Burn,Abnormal,Block,3,none,Loses hp, every turn\n",
        "# id,name,element,type,power,anger,accuracy,options,description\n\
         10,Ember,2,2,40,10,100,critical=10,Burns sometimes\n",
        "# owner,owner_id,timing,ability,options\n\
         skill,10,OnAttack,AddBuff,who=op&id=70&turn=3\n\
         buff,70,OnTurnEnd,Heal,add=-10&type=buff\n",
    );
    let ctx = ResolverContext::new(&db, &config);

    let mut state = battle(&config);
    state.my_unit.set_skill(db.skill(10).unwrap());

    EffectResolver::resolve_timing(&mut state, EffectTiming::OnAttack, &ctx);
    let foe = state.op_unit.pet().unwrap();
    assert_eq!(foe.buffs.get_buff(70).map(|b| b.turn), Some(3));

    EffectResolver::resolve_timing(&mut state, EffectTiming::OnTurnEnd, &ctx);
    assert_eq!(state.op_unit.skill_system.buff_heal, -10);
}
