//! The match loop
//!
//! A [`Duel`] owns both fighters and everything they share: the pickup pool,
//! the spawner and the buff notices. [`Duel::step`] advances one frame in a
//! fixed order:
//!
//! 1. movement and dodges
//! 2. attacks and skills (ranged arrows advance here)
//! 3. pickup spawn and collection
//! 4. damage-number pruning
//! 5. animation
//! 6. end-of-match check

use bevy::prelude::*;

use crate::arena::{Clock, Collider};
use crate::buff::{BuffKind, BuffPickup, BuffSpawner};
use crate::combat::log::{CombatLog, CombatLogEventType, DamageRecord};
use crate::combat::{DamageOutcome, GameRng, StrikeResult, Strikes};
use crate::constants::*;
use crate::controls::ControlScheme;
use crate::fighter::{Fighter, PlayerSlot};
use crate::pool::{EntityPool, Handle};
use crate::roster::{Archetype, Roster};
use crate::services::{AssetService, InputSource, RenderSink};

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Winner(PlayerSlot),
    /// Both fighters fell on the same frame
    Draw,
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<PlayerSlot> {
        match self {
            MatchOutcome::Winner(slot) => Some(*slot),
            MatchOutcome::Draw => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            MatchOutcome::Winner(slot) => format!("{} wins!", slot.label()),
            MatchOutcome::Draw => "Draw!".to_string(),
        }
    }
}

/// "Player N picked up X", shown for a few seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuffNotice {
    pub slot: PlayerSlot,
    pub kind: BuffKind,
    pub at: f32,
}

impl BuffNotice {
    pub fn is_visible(&self, now: f32) -> bool {
        now - self.at <= BUFF_NOTICE_DURATION
    }

    pub fn message(&self) -> String {
        format!("{} picked up {}", self.slot.label(), self.kind.name())
    }
}

#[derive(Debug, Clone)]
pub struct Duel {
    /// Indexed by slot: `[One, Two]`
    pub fighters: [Fighter; 2],
    pub controls: [ControlScheme; 2],
    pub pickups: EntityPool<BuffPickup>,
    pub spawner: BuffSpawner,
    pub notices: Vec<BuffNotice>,
    pub outcome: Option<MatchOutcome>,
    pub ended_at: Option<f32>,
}

impl Duel {
    pub fn new(p1: Fighter, p2: Fighter, controls: [ControlScheme; 2], start_time: f32) -> Self {
        Self {
            fighters: [p1, p2],
            controls,
            pickups: EntityPool::new(),
            spawner: BuffSpawner::new(start_time),
            notices: Vec::new(),
            outcome: None,
            ended_at: None,
        }
    }

    /// Two fighters with the default control schemes.
    pub fn from_archetypes(
        p1: Archetype,
        p2: Archetype,
        roster: &Roster,
        assets: &mut dyn AssetService,
        start_time: f32,
    ) -> Self {
        let one = Fighter::new(PlayerSlot::One, p1, &roster.stats(p1), assets, start_time);
        let two = Fighter::new(PlayerSlot::Two, p2, &roster.stats(p2), assets, start_time);
        Self::new(
            one,
            two,
            [ControlScheme::player_one(), ControlScheme::player_two()],
            start_time,
        )
    }

    pub fn fighter(&self, slot: PlayerSlot) -> &Fighter {
        &self.fighters[slot_index(slot)]
    }

    pub fn fighter_mut(&mut self, slot: PlayerSlot) -> &mut Fighter {
        &mut self.fighters[slot_index(slot)]
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Advance one frame. Once an outcome is decided it is returned unchanged
    /// and nothing else is simulated.
    pub fn step(
        &mut self,
        input: &dyn InputSource,
        clock: Clock,
        rng: &mut GameRng,
        log: &mut CombatLog,
    ) -> Option<MatchOutcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        let now = clock.now;
        log.match_time = now;

        let [one, two] = &mut self.fighters;
        let [controls_one, controls_two] = &self.controls;

        one.move_with(input, controls_one);
        one.dodge(input, controls_one, now);
        two.move_with(input, controls_two);
        two.dodge(input, controls_two, now);

        resolve_combat(one, two, controls_one, input, clock, rng, log);
        resolve_combat(two, one, controls_two, input, clock, rng, log);

        self.update_pickups(now, rng, log);

        let [one, two] = &mut self.fighters;
        let [controls_one, controls_two] = &self.controls;
        for (fighter, controls) in [(one, controls_one), (two, controls_two)] {
            fighter.update_damage_numbers(now);
            let moving = fighter.is_alive() && controls.is_moving(input);
            fighter.update_animation(now, moving);
        }
        self.notices.retain(|n| n.is_visible(now));

        self.check_match_end(now, log)
    }

    fn update_pickups(&mut self, now: f32, rng: &mut GameRng, log: &mut CombatLog) {
        if let Some(pickup) = self.spawner.tick(now, rng) {
            self.pickups.insert(pickup);
        }

        let [one, two] = &mut self.fighters;
        let mut consumed: Vec<(Handle, PlayerSlot, BuffKind)> = Vec::new();

        for (handle, pickup) in self.pickups.iter() {
            // Player one is checked first; while they stand on a pickup,
            // player two cannot take it, even if player one is mid-dodge.
            let taker = if one.overlaps(pickup) {
                pickup.apply_to(one).then_some(one.slot)
            } else if two.overlaps(pickup) {
                pickup.apply_to(two).then_some(two.slot)
            } else {
                None
            };

            if let Some(slot) = taker {
                consumed.push((handle, slot, pickup.kind));
            }
        }

        for (handle, slot, kind) in consumed {
            self.pickups.mark_removed(handle);
            let notice = BuffNotice { slot, kind, at: now };
            info!("{}", notice.message());
            log.log(CombatLogEventType::Buff, notice.message());
            self.notices.push(notice);
        }
        self.pickups.compact();
    }

    fn check_match_end(&mut self, now: f32, log: &mut CombatLog) -> Option<MatchOutcome> {
        let [one, two] = &self.fighters;
        let outcome = match (one.is_dead, two.is_dead) {
            (false, false) => return None,
            (true, true) => MatchOutcome::Draw,
            (false, true) => MatchOutcome::Winner(PlayerSlot::One),
            (true, false) => MatchOutcome::Winner(PlayerSlot::Two),
        };

        self.outcome = Some(outcome);
        self.ended_at = Some(now);

        let message = format!("Match ended! {}", outcome.describe());
        info!("{}", message);
        log.log(CombatLogEventType::MatchEvent, message);

        self.outcome
    }

    /// The results screen appears a short delay after the final blow.
    pub fn results_visible(&self, now: f32) -> bool {
        self.ended_at.is_some_and(|t| now - t > GAME_END_DELAY)
    }

    pub fn active_notices(&self, now: f32) -> impl Iterator<Item = &BuffNotice> {
        self.notices.iter().filter(move |n| n.is_visible(now))
    }

    pub fn draw(&self, sink: &mut dyn RenderSink, assets: &dyn AssetService, now: f32) {
        for fighter in &self.fighters {
            fighter.draw(sink, assets, now);
        }
        for (_, pickup) in self.pickups.iter() {
            pickup.draw(sink);
        }
        self.draw_hud(sink, now);
    }

    fn draw_hud(&self, sink: &mut dyn RenderSink, now: f32) {
        const BAR_WIDTH: f32 = 300.0;
        const BAR_HEIGHT: f32 = 20.0;
        const MARGIN: f32 = 20.0;

        for fighter in &self.fighters {
            let x = match fighter.slot {
                PlayerSlot::One => MARGIN,
                PlayerSlot::Two => ARENA_WIDTH - MARGIN - BAR_WIDTH,
            };
            let top_left = Vec2::new(x, MARGIN);
            let fraction = (fighter.health / fighter.max_health).clamp(0.0, 1.0);

            sink.filled_rect(top_left, top_left + Vec2::new(BAR_WIDTH, BAR_HEIGHT), Color::srgb(0.25, 0.0, 0.0));
            sink.filled_rect(
                top_left,
                top_left + Vec2::new(BAR_WIDTH * fraction, BAR_HEIGHT),
                Color::srgb(0.1, 0.8, 0.1),
            );
            sink.outlined_rect(top_left, top_left + Vec2::new(BAR_WIDTH, BAR_HEIGHT), Color::WHITE);
            sink.text(
                top_left + Vec2::new(0.0, BAR_HEIGHT + 2.0),
                &format!("{} {:.0}/{:.0}", fighter.name(), fighter.health, fighter.max_health),
                Color::WHITE,
            );

            if let Some(charge) = fighter.charge() {
                let bar_top = top_left + Vec2::new(0.0, BAR_HEIGHT + 24.0);
                let fill = BAR_WIDTH * (charge / MAX_CHARGE).min(1.0);
                sink.filled_rect(bar_top, bar_top + Vec2::new(fill, 8.0), Color::srgb(1.0, 0.85, 0.2));
                sink.outlined_rect(bar_top, bar_top + Vec2::new(BAR_WIDTH, 8.0), Color::WHITE);
            }
        }

        for (i, notice) in self.active_notices(now).enumerate() {
            sink.text(
                Vec2::new(ARENA_WIDTH / 2.0 - 120.0, 80.0 + i as f32 * 20.0),
                &notice.message(),
                notice.kind.color(),
            );
        }

        if let Some(outcome) = self.outcome {
            if self.results_visible(now) {
                sink.text(
                    Vec2::new(ARENA_WIDTH / 2.0 - 60.0, ARENA_HEIGHT / 2.0),
                    &outcome.describe(),
                    Color::WHITE,
                );
            }
        }
    }
}

fn slot_index(slot: PlayerSlot) -> usize {
    match slot {
        PlayerSlot::One => 0,
        PlayerSlot::Two => 1,
    }
}

/// Run `attacker`'s attack and skill against `defender` and log the results.
fn resolve_combat(
    attacker: &mut Fighter,
    defender: &mut Fighter,
    controls: &ControlScheme,
    input: &dyn InputSource,
    clock: Clock,
    rng: &mut GameRng,
    log: &mut CombatLog,
) {
    // A fighter killed earlier this frame no longer acts
    if attacker.is_dead {
        return;
    }
    let mut strikes = attacker.attack(defender, input, controls, clock, rng);
    strikes.extend(attacker.use_skill(defender, input, controls, clock.now));
    record_strikes(attacker, defender, &strikes, log);
}

fn record_strikes(attacker: &Fighter, defender: &Fighter, strikes: &Strikes, log: &mut CombatLog) {
    let source_id = attacker.name();
    let target_id = defender.name();

    for strike in strikes {
        let ability = strike.source.name();
        match strike.result {
            StrikeResult::Missed => {
                log.log(
                    CombatLogEventType::Miss,
                    format!("{}'s {} misses {}", source_id, ability, target_id),
                );
            }
            StrikeResult::Landed(DamageOutcome::Ignored) => {
                log.log(
                    CombatLogEventType::Avoided,
                    format!("{} avoids {}'s {}", target_id, source_id, ability),
                );
            }
            StrikeResult::Landed(DamageOutcome::Absorbed) => {
                log.log(
                    CombatLogEventType::Avoided,
                    format!("{}'s shield absorbs {}'s {}", target_id, source_id, ability),
                );
            }
            StrikeResult::Landed(DamageOutcome::Applied { amount, fatal }) => {
                let verb = if strike.crit { "CRITS" } else { "hits" };
                let message = format!(
                    "{}'s {} {} {} for {:.0} damage",
                    source_id, ability, verb, target_id, amount
                );
                info!("{}", message);
                log.log_damage(
                    DamageRecord {
                        source: source_id.clone(),
                        target: target_id.clone(),
                        ability: ability.to_string(),
                        amount,
                        crit: strike.crit,
                        is_killing_blow: fatal,
                    },
                    message,
                );

                if fatal {
                    log.log(
                        CombatLogEventType::Death,
                        format!("{} has been defeated by {}", target_id, source_id),
                    );
                }
            }
        }
    }
}
