mod common;

use catcus_arena::entities::{BoostKind, EntityId, EntityKind};
use catcus_arena::error::GameError;
use catcus_arena::frame::Frame;
use catcus_arena::geometry::{Point, Rect};
use catcus_arena::input::{InputEvent, Key};
use catcus_arena::registry::EntityRegistry;

use common::Harness;

// ── Player registration ───────────────────────────────────────────────────────

#[test]
fn player_can_only_be_registered_once() {
    let mut h = Harness::new();
    let second = h.prefabs.player(h.registry.allocate_id());
    assert!(matches!(
        h.registry.init_player(second),
        Err(GameError::PlayerAlreadyRegistered)
    ));
}

#[test]
fn update_without_player_is_an_error() {
    let mut h = Harness::new();
    let mut registry = EntityRegistry::new();
    let mut frame = Frame {
        surface: &mut h.surface,
        audio: &mut h.audio,
        rng: &mut h.rng,
        prefabs: &h.prefabs,
        pointer: Point::default(),
    };
    assert!(matches!(
        registry.update_entities(&mut frame),
        Err(GameError::MissingPlayer)
    ));
}

#[test]
fn allocated_ids_are_unique() {
    let mut registry = EntityRegistry::new();
    let a = registry.allocate_id();
    let b = registry.allocate_id();
    assert_ne!(a, b);
}

// ── Add / remove ──────────────────────────────────────────────────────────────

#[test]
fn removing_absent_ids_is_a_noop() {
    let mut h = Harness::new();
    let enemy = h.prefabs.enemy_at(h.registry.allocate_id(), 10, 10);
    h.registry.add_enemy(enemy);

    h.registry.remove_enemy(EntityId(999));
    h.registry.remove_power_up(EntityId(999));
    h.registry.remove_coin(EntityId(999));

    assert_eq!(h.registry.enemies().len(), 1);
    assert!(h.registry.power_ups().is_empty());
    assert!(h.registry.coins().is_empty());
}

#[test]
fn duplicate_ids_are_not_added_twice() {
    let mut h = Harness::new();
    let id = h.registry.allocate_id();
    h.registry.add_coin(h.prefabs.coin(id, Point::new(0, 0)));
    h.registry.add_coin(h.prefabs.coin(id, Point::new(100, 100)));
    assert_eq!(h.registry.coins().len(), 1);
    assert_eq!(h.registry.coins()[0].rect().x, 0);
}

#[test]
fn populations_keep_insertion_order() {
    let mut h = Harness::new();
    let mut ids = Vec::new();
    for kind in BoostKind::ALL {
        let id = h.registry.allocate_id();
        ids.push(id);
        h.registry.add_power_up(h.prefabs.power_up_at(id, kind, 0, 0));
    }
    h.registry.remove_power_up(ids[1]);
    let left: Vec<_> = h.registry.power_ups().iter().map(|p| p.id()).collect();
    assert_eq!(left, vec![ids[0], ids[2]]);
}

// ── Event fan-out ─────────────────────────────────────────────────────────────

#[test]
fn events_reach_every_entity() {
    let mut h = Harness::new();
    let enemy = h.prefabs.enemy_at(h.registry.allocate_id(), 10, 10);
    h.registry.add_enemy(enemy);

    let event = Some(InputEvent::KeyDown(Key::Char('w')));
    h.registry.dispatch_event(event);
    assert_eq!(h.player().input().current(), event);
    assert_eq!(h.registry.enemies()[0].input().current(), event);
}

// ── Update pass ───────────────────────────────────────────────────────────────

#[test]
fn dead_enemy_becomes_a_coin() {
    let mut h = Harness::new();
    let mut enemy = h.prefabs.enemy_at(h.registry.allocate_id(), 600, 100);
    enemy.health = 0;
    h.registry.add_enemy(enemy);

    h.frame(None);

    assert!(h.registry.enemies().is_empty());
    assert_eq!(h.registry.coins().len(), 1);
    let coin = &h.registry.coins()[0];
    assert_eq!(*coin.kind(), EntityKind::Coin);
    assert_eq!(coin.rect(), Rect::new(620, 140, 40, 40));
}

#[test]
fn living_enemies_are_kept_and_drawn() {
    let mut h = Harness::new();
    let enemy = h.prefabs.enemy_at(h.registry.allocate_id(), 600, 100);
    let id = enemy.id();
    h.registry.add_enemy(enemy);

    h.frame(None);

    assert_eq!(h.registry.enemies().len(), 1);
    assert_eq!(h.registry.enemies()[0].id(), id);
    assert!(h.surface.sprites.iter().any(|s| s.dest.x >= 599 && s.dest.w == 80));
}
