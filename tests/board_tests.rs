use broadside::{
    AbilityManager, AttackResult, CellStatus, GameError, GameField, Orientation, SegmentState,
    ShipManager, ShipRef,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// 10×10 field with one length-2 horizontal ship at (0,0)-(1,0).
fn field_with_destroyer() -> (GameField, ShipManager) {
    let mut field = GameField::new(10, 10);
    let mut ships = ShipManager::new(&[2]);
    field
        .place_ship(&mut ships, 0, 0, 0, Orientation::Horizontal)
        .unwrap();
    (field, ships)
}

#[test]
fn test_new_field_is_unknown() {
    let field = GameField::new(4, 3);
    assert!(field.is_valid());
    assert_eq!(field.cells().count(), 12);
    assert!(field.cells().all(|(_, c)| c.status() == CellStatus::Unknown));
    assert!(!field.is_next_attack_double_damage());
}

#[test]
fn test_zero_sized_field_is_invalid() {
    let field = GameField::new(0, 5);
    assert!(!field.is_valid());
    assert!(matches!(field.cell_status(0, 0), Err(GameError::OutOfField { x: 0, y: 0 })));
}

#[test]
fn test_cell_out_of_bounds() {
    let field = GameField::new(10, 10);
    assert!(matches!(field.cell_status(10, 0), Err(GameError::OutOfField { x: 10, y: 0 })));
    assert!(matches!(field.cell_status(0, 10), Err(GameError::OutOfField { .. })));
    assert_eq!(field.ship_at(12, 12), None);
}

#[test]
fn test_place_ship_numbers_segments_from_bow() {
    let mut field = GameField::new(10, 10);
    let mut ships = ShipManager::new(&[3]);
    field
        .place_ship(&mut ships, 0, 4, 2, Orientation::Vertical)
        .unwrap();
    for segment in 0..3 {
        assert_eq!(field.cell_status(4, 2 + segment).unwrap(), CellStatus::Ship);
        assert_eq!(field.ship_at(4, 2 + segment), Some(ShipRef { ship: 0, segment }));
    }
    assert_eq!(ships.ship(0).unwrap().orientation(), Orientation::Vertical);
    assert_eq!(field.cell_status(4, 5).unwrap(), CellStatus::Unknown);
}

#[test]
fn test_adjacent_placement_rejected() {
    let (field, ships) = field_with_destroyer();
    let ship = ships.ship(0).unwrap();
    assert!(!field.can_place_ship(ship, 2, 0, Orientation::Horizontal));
    assert!(field.can_place_ship(ship, 3, 0, Orientation::Horizontal));
    // diagonal contact counts too
    assert!(!field.can_place_ship(ship, 2, 1, Orientation::Vertical));
    assert!(field.can_place_ship(ship, 2, 2, Orientation::Vertical));
}

#[test]
fn test_placement_must_fit_in_bounds() {
    let field = GameField::new(10, 10);
    let ships = ShipManager::new(&[4]);
    let ship = ships.ship(0).unwrap();
    assert!(field.can_place_ship(ship, 0, 6, Orientation::Vertical));
    assert!(!field.can_place_ship(ship, 0, 7, Orientation::Vertical));
    assert!(field.can_place_ship(ship, 6, 9, Orientation::Horizontal));
    assert!(!field.can_place_ship(ship, 7, 9, Orientation::Horizontal));
    assert!(!field.can_place_ship(ship, usize::MAX, 0, Orientation::Horizontal));
}

#[test]
fn test_rejected_placement_leaves_field_untouched() {
    let (mut field, _) = field_with_destroyer();
    let before = field.clone();
    let mut ships = ShipManager::new(&[2, 2]);
    let result = field.place_ship(&mut ships, 1, 1, 1, Orientation::Horizontal);
    assert!(matches!(result, Err(GameError::ShipPlacement)));
    assert_eq!(field, before);

    let missing = field.place_ship(&mut ships, 5, 6, 6, Orientation::Horizontal);
    assert!(matches!(missing, Err(GameError::ShipPlacement)));
}

#[test]
fn test_attack_miss_marks_empty() {
    let (mut field, mut ships) = field_with_destroyer();
    let mut rng = SmallRng::seed_from_u64(1);
    let result = field.attack_cell(5, 5, &mut ships, None, &mut rng).unwrap();
    assert_eq!(result, AttackResult::Miss);
    assert_eq!(field.cell_status(5, 5).unwrap(), CellStatus::Empty);

    // a second miss on the same cell is still a miss
    let again = field.attack_cell(5, 5, &mut ships, None, &mut rng).unwrap();
    assert_eq!(again, AttackResult::Miss);
}

#[test]
fn test_attack_with_double_damage_destroys_ship() {
    let (mut field, mut ships) = field_with_destroyer();
    let mut rng = SmallRng::seed_from_u64(7);
    let mut rewards = AbilityManager::default();

    let first = field
        .attack_cell(0, 0, &mut ships, Some(&mut rewards), &mut rng)
        .unwrap();
    assert_eq!(first, AttackResult::Hit);
    assert_eq!(ships.ship(0).unwrap().segment_state(0).unwrap(), SegmentState::Damaged);

    field.set_next_attack_double_damage(true);
    let second = field
        .attack_cell(0, 0, &mut ships, Some(&mut rewards), &mut rng)
        .unwrap();
    assert_eq!(second, AttackResult::Hit);
    assert_eq!(ships.ship(0).unwrap().segment_state(0).unwrap(), SegmentState::Destroyed);
    assert!(!field.is_next_attack_double_damage());

    field.set_next_attack_double_damage(true);
    let third = field
        .attack_cell(1, 0, &mut ships, Some(&mut rewards), &mut rng)
        .unwrap();
    assert_eq!(third, AttackResult::ShipDestroyed);
    assert_eq!(rewards.len(), 1);
    assert!(ships.all_ships_destroyed());
    assert_eq!(field.cell_status(1, 0).unwrap(), CellStatus::Ship);
}

#[test]
fn test_doubled_hit_on_other_segment_leaves_ship_afloat() {
    let (mut field, mut ships) = field_with_destroyer();
    let mut rng = SmallRng::seed_from_u64(13);
    let mut rewards = AbilityManager::default();

    let first = field
        .attack_cell(0, 0, &mut ships, Some(&mut rewards), &mut rng)
        .unwrap();
    assert_eq!(first, AttackResult::Hit);

    field.set_next_attack_double_damage(true);
    let second = field
        .attack_cell(1, 0, &mut ships, Some(&mut rewards), &mut rng)
        .unwrap();
    assert_eq!(second, AttackResult::Hit);
    let ship = ships.ship(0).unwrap();
    assert_eq!(ship.segment_state(0).unwrap(), SegmentState::Damaged);
    assert_eq!(ship.segment_state(1).unwrap(), SegmentState::Destroyed);
    assert!(!ship.is_destroyed());
    assert!(!ships.all_ships_destroyed());
    assert!(rewards.is_empty());
    assert!(!field.is_next_attack_double_damage());
}

#[test]
fn test_destroyed_ship_grants_only_once() {
    let (mut field, mut ships) = field_with_destroyer();
    let mut rng = SmallRng::seed_from_u64(3);
    let mut rewards = AbilityManager::default();
    for x in 0..2 {
        for _ in 0..2 {
            field
                .attack_cell(x, 0, &mut ships, Some(&mut rewards), &mut rng)
                .unwrap();
        }
    }
    assert!(ships.all_ships_destroyed());
    assert_eq!(rewards.len(), 1);

    let after = field
        .attack_cell(0, 0, &mut ships, Some(&mut rewards), &mut rng)
        .unwrap();
    assert_eq!(after, AttackResult::Hit);
    assert_eq!(rewards.len(), 1);
}

#[test]
fn test_double_damage_consumed_by_miss() {
    let (mut field, mut ships) = field_with_destroyer();
    let mut rng = SmallRng::seed_from_u64(11);
    field.set_next_attack_double_damage(true);
    let miss = field.attack_cell(9, 9, &mut ships, None, &mut rng).unwrap();
    assert_eq!(miss, AttackResult::Miss);
    assert!(!field.is_next_attack_double_damage());

    field.attack_cell(0, 0, &mut ships, None, &mut rng).unwrap();
    assert_eq!(ships.ship(0).unwrap().segment_state(0).unwrap(), SegmentState::Damaged);
}

#[test]
fn test_attack_off_field_fails() {
    let (mut field, mut ships) = field_with_destroyer();
    let mut rng = SmallRng::seed_from_u64(5);
    field.set_next_attack_double_damage(true);
    let result = field.attack_cell(10, 0, &mut ships, None, &mut rng);
    assert!(matches!(result, Err(GameError::OutOfField { x: 10, y: 0 })));
    assert!(field.is_next_attack_double_damage(), "failed attacks keep the flag");
}

#[test]
fn test_attack_with_invalid_fleet_fails() {
    let mut field = GameField::new(5, 5);
    let mut ships = ShipManager::new(&[0]);
    let mut rng = SmallRng::seed_from_u64(5);
    let result = field.attack_cell(0, 0, &mut ships, None, &mut rng);
    assert!(matches!(result, Err(GameError::OutOfField { .. })));
    assert_eq!(field.cell_status(0, 0).unwrap(), CellStatus::Unknown);
}
