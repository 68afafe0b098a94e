//! Tests for the horde container (spawn/despawn, damage, contact, tick).

#[cfg(test)]
mod tests {
    use super::super::horde::*;
    use crate::ai::components::ZombieState;
    use crate::animation::Locomotion;
    use crate::ai::world::{Arena, HordeWorld};
    use crate::config::{HordeSettings, RoundConfig, ZombieConfig};
    use crate::navigation::{NavigationAdapter, Unrestricted};
    use crate::perception::ClearSight;
    use crate::round::{RoundOutcome, SurvivalRound};
    use crate::sound::SoundEventBus;
    use bevy::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn horde() -> (Horde, Rc<SoundEventBus>, Rc<RefCell<SurvivalRound>>) {
        let bus = Rc::new(SoundEventBus::new());
        let round = Rc::new(RefCell::new(SurvivalRound::new(RoundConfig::default())));
        let horde = Horde::new(bus.clone(), Rc::new(Unrestricted), Rc::new(ClearSight))
            .with_round(round.clone());
        (horde, bus, round)
    }

    #[test]
    fn test_spawn_subscribes_each_zombie() {
        let (mut horde, bus, _) = horde();

        let a = horde.spawn(ZombieConfig::default(), 100, Vec3::ZERO, Vec3::Z, 1);
        let b = horde.spawn(ZombieConfig::default(), 100, Vec3::X * 5.0, Vec3::Z, 2);

        assert_ne!(a, b);
        assert_eq!(horde.len(), 2);
        assert_eq!(bus.listener_count(), 2);
        assert_eq!(horde.ids(), vec![a, b]);
        assert_eq!(horde.view(a).unwrap().state, ZombieState::Wander);
    }

    #[test]
    fn test_despawn_unsubscribes_and_stops() {
        let (mut horde, bus, _) = horde();
        let id = horde.spawn(ZombieConfig::default(), 100, Vec3::ZERO, Vec3::Z, 1);
        let body = horde.body(id).unwrap();

        assert!(horde.despawn(id));
        assert!(!horde.despawn(id));
        assert!(horde.is_empty());
        assert_eq!(bus.listener_count(), 0);
        assert!(body.borrow().is_stopped());

        // Звук после despawn никого не трогает
        bus.emit(Vec3::ZERO, 50.0);
    }

    #[test]
    fn test_damage_kills_and_scores() {
        let (mut horde, bus, round) = horde();
        let id = horde.spawn(ZombieConfig::default(), 100, Vec3::ZERO, Vec3::Z, 1);

        assert_eq!(horde.damage(id, 40), Some(60));
        assert_eq!(horde.view(id).unwrap().health, 60);
        assert_eq!(round.borrow().score(), 0);

        assert_eq!(horde.damage(id, 80), Some(0));
        assert!(horde.view(id).is_none());
        assert_eq!(bus.listener_count(), 0);
        assert_eq!(round.borrow().score(), 1);

        assert_eq!(horde.damage(id, 10), None);
    }

    #[test]
    fn test_contact_loses_round() {
        let (mut horde, _, round) = horde();
        horde.spawn(ZombieConfig::default(), 100, Vec3::ZERO, Vec3::Z, 1);

        assert!(!horde.resolve_contacts(Vec3::new(3.0, 0.0, 0.0), 1.0));
        assert_eq!(round.borrow().outcome(), RoundOutcome::InProgress);

        assert!(horde.resolve_contacts(Vec3::new(0.5, 0.0, 0.0), 1.0));
        assert_eq!(round.borrow().outcome(), RoundOutcome::Died);
    }

    #[test]
    fn test_tick_moves_bodies_toward_sound() {
        let (mut horde, bus, _) = horde();
        let id = horde.spawn(ZombieConfig::default(), 100, Vec3::ZERO, Vec3::Z, 1);

        let sound = Vec3::new(8.0, 0.0, 0.0);
        bus.emit(sound, 10.0);
        assert_eq!(horde.view(id).unwrap().state, ZombieState::InvestigateSound);

        horde.tick(0.5, None);
        let view = horde.view(id).unwrap();
        assert_eq!(view.position, Vec3::new(1.5, 0.0, 0.0));
        assert_eq!(view.forward, Vec3::X);
        assert_eq!(view.locomotion, Locomotion::Moving);
        assert_eq!(view.commanded_speed, 3.0);

        // Дошли → Search
        for _ in 0..6 {
            horde.tick(0.5, None);
        }
        assert_eq!(horde.view(id).unwrap().state, ZombieState::Search);
    }

    #[test]
    fn test_screech_pulls_neighbours() {
        let (mut horde, _, _) = horde();
        let spotter = horde.spawn(ZombieConfig::default(), 100, Vec3::ZERO, Vec3::Z, 1);
        let neighbour = horde.spawn(ZombieConfig::default(), 100, Vec3::new(-12.0, 0.0, 0.0), Vec3::NEG_X, 2);
        let far = horde.spawn(ZombieConfig::default(), 100, Vec3::new(-40.0, 0.0, 0.0), Vec3::NEG_X, 3);

        // Стоит на месте и смотрит на игрока
        horde.body(spotter).unwrap().borrow_mut().stop();

        horde.tick(1.0 / 60.0, Some(Vec3::new(0.0, 0.0, 4.0)));

        assert_eq!(horde.view(spotter).unwrap().state, ZombieState::Chase);
        assert_eq!(horde.view(neighbour).unwrap().state, ZombieState::InvestigateSound);
        assert_eq!(horde.view(far).unwrap().state, ZombieState::Wander);

        let brain = horde.brain(neighbour).unwrap();
        assert!(brain.borrow().last_sound_pos().distance(Vec3::ZERO) < 0.1);
    }

    #[test]
    fn test_invalid_zombie_config_spawns_with_defaults() {
        let (mut horde, _bus, _) = horde();
        let broken = ZombieConfig {
            chase_speed: -1.0,
            ..Default::default()
        };

        let id = horde.spawn(broken, 100, Vec3::ZERO, Vec3::Z, 1);

        let brain = horde.brain(id).unwrap();
        assert_eq!(*brain.borrow().config(), ZombieConfig::default());
    }

    #[test]
    fn test_world_with_invalid_settings_uses_defaults() {
        let settings = HordeSettings {
            zombie: ZombieConfig {
                vision_angle: 270.0,
                ..Default::default()
            },
            round: RoundConfig {
                round_time: 30.0,
                ..Default::default()
            },
            ..Default::default()
        };

        let mut world = HordeWorld::new(settings, Arena::default());
        assert_eq!(*world.settings(), HordeSettings::default());

        let id = world.spawn_zombie(Vec3::ZERO, Vec3::Z, 1);
        let brain = world.horde().brain(id).unwrap();
        assert_eq!(brain.borrow().config().vision_angle, 60.0);
    }
}
