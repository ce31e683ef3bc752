//! Scripted animation sequences.
//!
//! ## Introduction
//!
//! Scripted motion is organised around two structures, [`Phase`] and
//! [`Sequence`].
//!
//! ### Phase
//!
//! A [`Phase`] is one timed step of a routine: a name, a duration, an
//! [`Easing`] curve, and an update function. The update function is a pure
//! function of the eased local progress in `[0, 1]`; it writes whatever pose
//! data the caller animates.
//!
//! ### Sequence
//!
//! A [`Sequence`] plays a fixed table of phases in order, driven by an
//! internal clock that the frame loop advances with a delta time. A trigger
//! starts a run only when no run is active and the caller reports its
//! prerequisites ready; otherwise the start is re-checked a bounded number
//! of times before giving up. Phases advance monotonically and the sequence
//! returns to idle exactly once after the last phase.
//!
//! The clock can be reversed for a fixed window with
//! [`Sequence::reverse_for`], which the collision guard uses to play a
//! "flinch and back off" without ever regressing to an earlier phase.
//!
//! [`Phase`]: struct.Phase.html
//! [`Sequence`]: struct.Sequence.html
//! [`Easing`]: enum.Easing.html
//! [`Sequence::reverse_for`]: struct.Sequence.html#method.reverse_for

use std::f32::consts::PI;

use cgmath::{Point3, Rad};

/// Number of delayed prerequisite re-checks before a trigger gives up.
const MAX_RETRIES: u32 = 5;
/// Delay between prerequisite re-checks, in seconds.
const RETRY_DELAY: f32 = 0.25;

/// Easing curve applied to a phase's local progress.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Easing {
    /// No easing.
    Linear,
    /// Quadratic ease-in.
    QuadIn,
    /// Cubic ease-in; used for anticipation moves.
    CubicIn,
    /// Cubic ease-out; used for releases.
    CubicOut,
    /// Cubic ease-in-out.
    CubicInOut,
    /// Bouncing ease-out; used for landings.
    BounceOut,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress.
    pub fn ease(
        self,
        t: f32,
    ) -> f32 {
        let t = t.max(0.0).min(1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 - 2.0 * t;
                    1.0 - u * u * u * 0.5
                }
            }
            Easing::BounceOut => bounce_out(t),
        }
    }
}

fn bounce_out(t: f32) -> f32 {
    const N: f32 = 7.5625;
    const D: f32 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// One timed step of a scripted sequence.
pub struct Phase<T> {
    /// Name, for logs and debugging.
    pub name: &'static str,
    /// Duration in seconds.
    pub duration: f32,
    /// Easing applied to the local progress.
    pub easing: Easing,
    /// Writes the pose for eased progress in `[0, 1]`.
    pub update: Box<dyn Fn(&mut T, f32)>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Idle,
    Waiting { retries_left: u32, next_check: f32 },
    Running { index: usize, phase_start: f32 },
}

/// A fixed table of phases played in order by an internal clock.
pub struct Sequence<T> {
    phases: Vec<Phase<T>>,
    state: State,
    clock: f32,
    time_scale: f32,
    reverse_left: f32,
}

impl<T> Sequence<T> {
    /// Creates an idle sequence from a phase table.
    pub fn new(phases: Vec<Phase<T>>) -> Self {
        Sequence {
            phases,
            state: State::Idle,
            clock: 0.0,
            time_scale: 1.0,
            reverse_left: 0.0,
        }
    }

    /// Whether a run is active, including one still waiting on prerequisites.
    pub fn is_running(&self) -> bool {
        self.state != State::Idle
    }

    /// Name of the phase currently playing, if any.
    pub fn current_phase(&self) -> Option<&'static str> {
        match self.state {
            State::Running { index, .. } => self.phases.get(index).map(|p| p.name),
            _ => None,
        }
    }

    /// Whether the clock is currently running backward.
    pub fn is_reversed(&self) -> bool {
        self.time_scale < 0.0
    }

    /// Requests a run.
    ///
    /// A no-op while a run is active: re-triggering neither queues nor
    /// restarts. If `ready` is false the start is deferred and re-checked a
    /// bounded number of times on subsequent updates.
    pub fn trigger(
        &mut self,
        ready: bool,
    ) {
        if self.phases.is_empty() {
            debug!("trigger ignored, the phase table is empty");
            return;
        }
        match self.state {
            State::Idle if ready => {
                self.state = State::Running {
                    index: 0,
                    phase_start: self.clock,
                };
                debug!("sequence started");
            }
            State::Idle => {
                self.state = State::Waiting {
                    retries_left: MAX_RETRIES,
                    next_check: self.clock + RETRY_DELAY,
                };
                debug!("sequence waiting on prerequisites");
            }
            _ => debug!("trigger ignored, sequence already active"),
        }
    }

    /// Runs the clock backward for `cooldown` seconds, then forward again.
    ///
    /// Progress within the current phase is clamped at the phase start, so
    /// a reversed clock never revisits an earlier phase.
    pub fn reverse_for(
        &mut self,
        cooldown: f32,
    ) {
        self.time_scale = -1.0;
        self.reverse_left = cooldown;
    }

    /// Advances the clock by `dt` seconds and applies the current phase to
    /// `target`. `ready` reports whether a deferred start may proceed.
    pub fn update(
        &mut self,
        dt: f32,
        target: &mut T,
        ready: bool,
    ) {
        if self.time_scale < 0.0 {
            self.reverse_left -= dt;
            if self.reverse_left <= 0.0 {
                self.time_scale = 1.0;
                self.reverse_left = 0.0;
            }
        }
        self.clock += dt * self.time_scale;

        match self.state {
            State::Idle => {}
            State::Waiting {
                retries_left,
                next_check,
            } => {
                if self.clock < next_check {
                    return;
                }
                if ready {
                    self.state = State::Running {
                        index: 0,
                        phase_start: self.clock,
                    };
                    debug!("sequence started after waiting");
                } else if retries_left > 1 {
                    self.state = State::Waiting {
                        retries_left: retries_left - 1,
                        next_check: self.clock + RETRY_DELAY,
                    };
                } else {
                    warn!("sequence prerequisites never became ready, aborting run");
                    self.state = State::Idle;
                }
            }
            State::Running { index, phase_start } => {
                let finished = {
                    let phase = &self.phases[index];
                    let local = if phase.duration <= 0.0 {
                        1.0
                    } else {
                        ((self.clock - phase_start) / phase.duration)
                            .max(0.0)
                            .min(1.0)
                    };
                    (phase.update)(target, phase.easing.ease(local));
                    local >= 1.0
                };
                // only forward time completes a phase
                if finished && self.time_scale > 0.0 {
                    if index + 1 == self.phases.len() {
                        self.state = State::Idle;
                        debug!("sequence finished");
                    } else {
                        debug!(
                            "phase {:?} done at {}",
                            self.phases[index].name, self.clock
                        );
                        self.state = State::Running {
                            index: index + 1,
                            phase_start: self.clock,
                        };
                    }
                }
            }
        }
    }
}

/// Horizontal bearing from `from` towards `to`, as a yaw around +Y.
pub fn bearing(
    from: Point3<f32>,
    to: Point3<f32>,
) -> Rad<f32> {
    Rad((to.x - from.x).atan2(to.z - from.z))
}

/// Blends `current` toward `target` yaw by `blend`, taking the short way
/// around the circle. Never snaps: the result moves gradually per call.
pub fn smooth_yaw(
    current: Rad<f32>,
    target: Rad<f32>,
    blend: f32,
) -> Rad<f32> {
    let mut delta = target.0 - current.0;
    while delta > PI {
        delta -= 2.0 * PI;
    }
    while delta < -PI {
        delta += 2.0 * PI;
    }
    Rad(current.0 + delta * blend.max(0.0).min(1.0))
}

#[cfg(test)]
mod tests {
    use cgmath::{Point3, Rad};
    use super::*;

    fn counting_sequence() -> Sequence<Vec<&'static str>> {
        let phase = |name, duration| Phase {
            name,
            duration,
            easing: Easing::Linear,
            update: Box::new(move |log: &mut Vec<&'static str>, _| {
                if log.last() != Some(&name) {
                    log.push(name);
                }
            }),
        };
        Sequence::new(vec![
            phase("first", 0.2),
            phase("second", 0.3),
            phase("third", 0.1),
        ])
    }

    #[test]
    fn empty_phase_table_never_starts() {
        let mut seq: Sequence<Vec<&'static str>> = Sequence::new(Vec::new());
        let mut log = Vec::new();
        seq.trigger(true);
        assert!(!seq.is_running());
        seq.update(0.1, &mut log, true);
        seq.trigger(false);
        seq.update(0.1, &mut log, false);
        assert!(!seq.is_running());
        assert!(log.is_empty());
    }

    #[test]
    fn easing_endpoints() {
        for &easing in &[
            Easing::Linear,
            Easing::QuadIn,
            Easing::CubicIn,
            Easing::CubicOut,
            Easing::CubicInOut,
            Easing::BounceOut,
        ] {
            assert!(easing.ease(0.0).abs() < 1e-6, "{:?} at 0", easing);
            assert!((easing.ease(1.0) - 1.0).abs() < 1e-6, "{:?} at 1", easing);
        }
    }

    #[test]
    fn phases_run_once_in_order() {
        let mut seq = counting_sequence();
        let mut log = Vec::new();
        seq.trigger(true);
        for _ in 0..100 {
            seq.update(0.02, &mut log, true);
        }
        assert_eq!(log, vec!["first", "second", "third"]);
        assert!(!seq.is_running());
    }

    #[test]
    fn trigger_is_not_reentrant() {
        let mut seq = counting_sequence();
        let mut log = Vec::new();
        seq.trigger(true);
        seq.update(0.25, &mut log, true);
        let phase = seq.current_phase();
        seq.trigger(true);
        assert_eq!(seq.current_phase(), phase);
    }

    #[test]
    fn unready_trigger_retries_then_aborts() {
        let mut seq = counting_sequence();
        let mut log = Vec::new();
        seq.trigger(false);
        assert!(seq.is_running());
        for _ in 0..200 {
            seq.update(0.05, &mut log, false);
        }
        assert!(!seq.is_running());
        assert!(log.is_empty());
    }

    #[test]
    fn deferred_start_happens_when_ready() {
        let mut seq = counting_sequence();
        let mut log = Vec::new();
        seq.trigger(false);
        seq.update(0.3, &mut log, true);
        assert_eq!(seq.current_phase(), Some("first"));
    }

    #[test]
    fn reversal_is_temporary_and_stays_in_phase() {
        let mut seq = counting_sequence();
        let mut log = Vec::new();
        seq.trigger(true);
        seq.update(0.25, &mut log, true);
        assert_eq!(seq.current_phase(), Some("second"));
        seq.reverse_for(0.5);
        assert!(seq.is_reversed());
        for _ in 0..30 {
            seq.update(0.05, &mut log, true);
        }
        assert!(!seq.is_reversed());
        // the reversed clock never moved the sequence back to "first"
        assert_eq!(log, vec!["first", "second", "third"]);
        assert!(!seq.is_running());
    }

    #[test]
    fn yaw_wraps_the_short_way() {
        let current = Rad(3.0);
        let target = Rad(-3.0);
        let next = smooth_yaw(current, target, 0.5);
        // short way crosses pi, so the yaw grows instead of swinging back
        assert!(next.0 > 3.0);
    }

    #[test]
    fn bearing_points_along_x() {
        let b = bearing(Point3::new(0.0, 0.0, 0.0), Point3::new(5.0, 2.0, 0.0));
        assert!((b.0 - ::std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
