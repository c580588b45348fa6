use std::io;

use broadside::{
    Ability, AbilityManager, AbilityOutcome, AiPlayer, GameError, GameField, Orientation, Player,
    Result, ScanReport, SegmentState, ShipManager,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Scanner input that always answers with the same origin.
struct FixedOrigin(usize, usize);

impl Player for FixedOrigin {
    fn place_ships<R: Rng>(&mut self, _: &mut R, _: &mut GameField, _: &mut ShipManager) -> Result<()> {
        Ok(())
    }

    fn scan_origin<R: Rng>(&mut self, _: &mut R, _: &GameField) -> Result<(usize, usize)> {
        Ok((self.0, self.1))
    }
}

/// Scanner input whose stream is already closed.
struct ClosedInput;

impl Player for ClosedInput {
    fn place_ships<R: Rng>(&mut self, _: &mut R, _: &mut GameField, _: &mut ShipManager) -> Result<()> {
        Ok(())
    }

    fn scan_origin<R: Rng>(&mut self, _: &mut R, _: &GameField) -> Result<(usize, usize)> {
        Err(io::Error::new(io::ErrorKind::UnexpectedEof, "closed").into())
    }
}

fn enemy() -> (GameField, ShipManager) {
    let mut field = GameField::new(6, 6);
    let mut ships = ShipManager::new(&[2, 1]);
    field
        .place_ship(&mut ships, 0, 1, 1, Orientation::Horizontal)
        .unwrap();
    field
        .place_ship(&mut ships, 1, 4, 4, Orientation::Horizontal)
        .unwrap();
    (field, ships)
}

#[test]
fn test_fresh_manager_holds_one_ability() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut manager = AbilityManager::new(&mut rng);
    assert!(manager.has_abilities());
    assert_eq!(manager.len(), 1);

    let (mut field, mut ships) = enemy();
    manager
        .use_ability(&mut field, &mut ships, &mut FixedOrigin(0, 0), &mut rng)
        .unwrap();
    assert!(!manager.has_abilities());
    assert!(matches!(
        manager.use_ability(&mut field, &mut ships, &mut FixedOrigin(0, 0), &mut rng),
        Err(GameError::NoAbility)
    ));
    assert!(matches!(manager.peek_first_name(), Err(GameError::NoAbility)));
}

#[test]
fn test_queue_is_first_in_first_out() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut manager: AbilityManager = [Ability::Scanner, Ability::DoubleDamage, Ability::Bombard]
        .into_iter()
        .collect();
    manager.push(Ability::Scanner);
    assert_eq!(manager.peek_first_name().unwrap(), "Scanner");

    let (mut field, mut ships) = enemy();
    let mut input = FixedOrigin(0, 0);
    let first = manager
        .use_ability(&mut field, &mut ships, &mut input, &mut rng)
        .unwrap();
    assert!(matches!(first, AbilityOutcome::Scanned(_)));
    assert_eq!(manager.peek_first_name().unwrap(), "Double Damage");
    let second = manager
        .use_ability(&mut field, &mut ships, &mut input, &mut rng)
        .unwrap();
    assert_eq!(second, AbilityOutcome::DoubleDamageArmed);
    assert_eq!(
        manager.iter().collect::<Vec<_>>(),
        vec![Ability::Bombard, Ability::Scanner]
    );
}

#[test]
fn test_granted_abilities_queue_at_the_back() {
    let mut rng = SmallRng::seed_from_u64(9);
    let mut manager: AbilityManager = [Ability::Bombard].into_iter().collect();
    let granted = manager.grant_random_ability(&mut rng);
    assert_eq!(manager.iter().collect::<Vec<_>>(), vec![Ability::Bombard, granted]);
    manager.clear();
    assert!(manager.is_empty());
}

#[test]
fn test_double_damage_arms_enemy_field() {
    let mut rng = SmallRng::seed_from_u64(2);
    let (mut field, mut ships) = enemy();
    let outcome = Ability::DoubleDamage
        .apply(&mut field, &mut ships, &mut AiPlayer::new(), &mut rng)
        .unwrap();
    assert_eq!(outcome, AbilityOutcome::DoubleDamageArmed);
    assert!(outcome.succeeded());
    assert!(field.is_next_attack_double_damage());
}

#[test]
fn test_scanner_reports_block() {
    let (field, _) = enemy();
    let report = ScanReport::scan(&field, (0, 0));
    assert_eq!(
        report.cells,
        vec![((0, 0), false), ((0, 1), false), ((1, 0), false), ((1, 1), true)]
    );
    assert_eq!(report.ships_found().collect::<Vec<_>>(), vec![(1, 1)]);
    assert!(report.found_ship());

    let corner = ScanReport::scan(&field, (5, 5));
    assert_eq!(corner.cells, vec![((5, 5), false)]);
    assert!(!corner.found_ship());

    let outside = ScanReport::scan(&field, (usize::MAX, 9));
    assert!(outside.cells.is_empty());
}

#[test]
fn test_scanner_uses_input_origin() {
    let mut rng = SmallRng::seed_from_u64(4);
    let (mut field, mut ships) = enemy();
    let outcome = Ability::Scanner
        .apply(&mut field, &mut ships, &mut FixedOrigin(3, 3), &mut rng)
        .unwrap();
    match outcome {
        AbilityOutcome::Scanned(report) => {
            assert_eq!(report.origin, (3, 3));
            assert_eq!(report.ships_found().collect::<Vec<_>>(), vec![(4, 4)]);
        }
        other => panic!("unexpected outcome {:?}", other),
    }
}

#[test]
fn test_scanner_requeued_when_input_fails() {
    let mut rng = SmallRng::seed_from_u64(4);
    let (mut field, mut ships) = enemy();
    let mut manager: AbilityManager = [Ability::Scanner, Ability::Bombard].into_iter().collect();
    let result = manager.use_ability(&mut field, &mut ships, &mut ClosedInput, &mut rng);
    assert!(matches!(result, Err(GameError::Io(_))));
    assert_eq!(
        manager.iter().collect::<Vec<_>>(),
        vec![Ability::Scanner, Ability::Bombard]
    );
}

#[test]
fn test_bombard_damages_surviving_ship() {
    let mut rng = SmallRng::seed_from_u64(8);
    let (mut field, mut ships) = enemy();
    ships.apply_damage_to_ship(0, 0, 2).unwrap();
    ships.apply_damage_to_ship(0, 1, 2).unwrap();

    let outcome = Ability::Bombard
        .apply(&mut field, &mut ships, &mut AiPlayer::new(), &mut rng)
        .unwrap();
    assert_eq!(outcome, AbilityOutcome::Bombarded { ship: 1, segment: 0 });
    assert_eq!(ships.ship(1).unwrap().segment_state(0).unwrap(), SegmentState::Damaged);
}

#[test]
fn test_bombard_without_targets_fails() {
    let mut rng = SmallRng::seed_from_u64(8);
    let (mut field, mut ships) = enemy();
    ships.apply_damage_to_ship(0, 0, 2).unwrap();
    ships.apply_damage_to_ship(0, 1, 2).unwrap();
    ships.apply_damage_to_ship(1, 0, 2).unwrap();
    let before = ships.clone();

    let outcome = Ability::Bombard
        .apply(&mut field, &mut ships, &mut AiPlayer::new(), &mut rng)
        .unwrap();
    assert_eq!(outcome, AbilityOutcome::NoTarget);
    assert!(!outcome.succeeded());
    assert_eq!(ships, before);
}

#[test]
fn test_ability_names() {
    for ability in Ability::ALL {
        assert_eq!(ability.name().parse::<Ability>().unwrap(), ability);
        assert_eq!(ability.to_string(), ability.name());
    }
    assert!(matches!("Laser".parse::<Ability>(), Err(GameError::Format(_))));
}
