//! Navigation state machine and the only writer of the current index.
//! Inputs return [`Effect`]s for the shell to apply; timers and the DOM
//! stay on the shell side.

use serde::Serialize;

use crate::config::{Direction, SliderConfig};
use crate::deck::Deck;
use crate::dots;
use crate::transform::{commit_threshold, compute_x, Geometry};

/// Side effects the shell must carry out, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Move the track to `x` pixels, with or without a CSS transition.
    SetTransform { x: f64, animate: bool },
    /// Clone the slide with `source_real` and append it as the transient
    /// wrap tail.
    AppendTransientClone { source_real: usize },
    /// Remove the transient wrap tail from the DOM.
    RemoveTransientClone,
    /// Highlight the given dot slot (`None` clears the highlight).
    SetActiveDot { slot: Option<usize> },
    /// Start the single-slot settle fallback timer.
    ArmSettleFallback { ms: u32 },
    /// Cancel the settle fallback timer if one is pending.
    DisarmSettleFallback,
    /// (Re)start the autoplay interval, replacing any prior timer.
    StartAutoplay { period_ms: u32 },
    /// Stop the autoplay interval.
    StopAutoplay,
}

/// Who currently owns the track transform.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Phase {
    Idle,
    Transitioning { target: usize, wrap: bool },
    Dragging { start_x: f64, origin_x: f64 },
}

/// Read-only state snapshot handed to the host page.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub real_count: usize,
    pub working_count: usize,
    pub current_index: usize,
    pub playing: bool,
    pub infinite: bool,
    pub direction: Direction,
}

pub struct SliderEngine {
    config: SliderConfig,
    deck: Deck,
    geometry: Geometry,
    current: usize,
    phase: Phase,
    playing: bool,
    manual_pause: bool,
}

impl SliderEngine {
    /// The shell validates the slide count before construction; an empty deck
    /// still yields a working (inert) engine.
    pub fn new(config: SliderConfig, real_count: usize) -> Self {
        let deck = Deck::new(real_count, config.direction, config.infinite);
        let current = deck.initial_index();
        Self {
            config,
            deck,
            geometry: Geometry::default(),
            current,
            phase: Phase::Idle,
            playing: false,
            manual_pause: false,
        }
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            real_count: self.deck.real_count(),
            working_count: self.deck.len(),
            current_index: self.current,
            playing: self.playing,
            infinite: self.config.infinite,
            direction: self.config.direction,
        }
    }

    fn x_of(&self, dom_index: usize) -> f64 {
        compute_x(dom_index, self.deck.len(), self.geometry, self.config.direction)
    }

    fn active_dot(&self) -> Option<usize> {
        dots::active_slot(self.current, &self.deck, self.config.direction)
    }

    // ------------------------------------------------------------------
    // Mounting
    // ------------------------------------------------------------------

    /// Record freshly measured geometry and re-apply the current transform
    /// without animation. Used at mount and after a debounced resize; never
    /// changes the current index.
    pub fn set_geometry(&mut self, geometry: Geometry) -> Vec<Effect> {
        self.geometry = geometry;
        if self.deck.is_empty() {
            return Vec::new();
        }
        vec![Effect::SetTransform {
            x: self.x_of(self.current),
            animate: false,
        }]
    }

    /// Finish mounting: paint the initial dot and kick off autoplay if the
    /// configuration asks for it.
    pub fn start(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::SetActiveDot {
            slot: self.active_dot(),
        }];
        if self.config.autoplay && !self.manual_pause {
            self.playing = true;
            effects.push(Effect::StartAutoplay {
                period_ms: self.config.autoplay_period_ms(),
            });
        }
        effects
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Animate to a dom index. Dropped (not queued) while a transition or a
    /// drag owns the track. Finite mode clamps or wraps the index; infinite
    /// mode passes it through and corrects clone landings at settle.
    pub fn go_to(&mut self, dom_index: usize) -> Vec<Effect> {
        if self.phase != Phase::Idle || self.deck.is_empty() {
            return Vec::new();
        }
        let last = self.deck.len() - 1;
        let target = if self.config.infinite {
            dom_index.min(last)
        } else if self.config.loop_ {
            dom_index % self.deck.len()
        } else {
            dom_index.min(last)
        };
        self.begin_transition(target, false)
    }

    /// Navigate to a user-facing slot (always counted left-to-right), as the
    /// dots do: inverted under rtl, then shifted past the head clone.
    pub fn go_to_user_index(&mut self, slot: usize) -> Vec<Effect> {
        if slot >= self.deck.real_count() {
            return Vec::new();
        }
        let target = dots::slot_target(slot, &self.deck, self.config.direction);
        self.go_to(target)
    }

    /// Advance one dom step; at the finite boundary either hard-stop or run
    /// the transient-clone wrap.
    pub fn next(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Idle || self.deck.is_empty() {
            return Vec::new();
        }
        if self.config.infinite || self.current + 1 < self.deck.len() {
            self.go_to(self.current + 1)
        } else if self.config.loop_ {
            self.wrap_forward()
        } else {
            Vec::new()
        }
    }

    /// Retreat one dom step; at dom 0 in loop mode, jump straight to the
    /// last slide (there is no smooth backward wrap).
    pub fn prev(&mut self) -> Vec<Effect> {
        if self.phase != Phase::Idle || self.deck.is_empty() {
            return Vec::new();
        }
        if self.config.infinite || self.current > 0 {
            self.go_to(self.current.saturating_sub(1))
        } else if self.config.loop_ {
            self.current = self.deck.len() - 1;
            vec![
                Effect::SetTransform {
                    x: self.x_of(self.current),
                    animate: false,
                },
                Effect::SetActiveDot {
                    slot: self.active_dot(),
                },
            ]
        } else {
            Vec::new()
        }
    }

    /// Forward wrap for finite+loop: grow the track with a transient copy of
    /// the visual-first slide, animate onto it, clean up at settle.
    fn wrap_forward(&mut self) -> Vec<Effect> {
        let source_real = self.deck.push_transient();
        let target = self.deck.len() - 1;
        let mut effects = vec![Effect::AppendTransientClone { source_real }];
        effects.extend(self.begin_transition(target, true));
        effects
    }

    fn begin_transition(&mut self, target: usize, wrap: bool) -> Vec<Effect> {
        self.phase = Phase::Transitioning { target, wrap };
        vec![
            Effect::SetTransform {
                x: self.x_of(target),
                animate: true,
            },
            Effect::ArmSettleFallback {
                ms: self.config.settle_fallback_ms(),
            },
        ]
    }

    // ------------------------------------------------------------------
    // Settle: two producers, one consumer
    // ------------------------------------------------------------------

    /// The track's transition-completion event. Ignored unless a transition
    /// is actually in flight (late events from a cancelled transition are
    /// expected and harmless).
    pub fn transition_ended(&mut self) -> Vec<Effect> {
        if !self.is_transitioning() {
            return Vec::new();
        }
        let mut effects = vec![Effect::DisarmSettleFallback];
        effects.extend(self.settle());
        effects
    }

    /// The fallback timer. Fires when the completion event was dropped, e.g.
    /// an effectively-zero-duration transition; the phase check guarantees
    /// settle runs exactly once per transition.
    pub fn settle_timeout(&mut self) -> Vec<Effect> {
        self.settle()
    }

    fn settle(&mut self) -> Vec<Effect> {
        let Phase::Transitioning { target, wrap } = self.phase else {
            return Vec::new();
        };
        self.phase = Phase::Idle;
        let mut effects = Vec::new();
        if wrap {
            self.deck.pop_transient();
            self.current = 0;
            effects.push(Effect::RemoveTransientClone);
            effects.push(Effect::SetTransform {
                x: self.x_of(0),
                animate: false,
            });
        } else if self.config.infinite && target + 1 == self.deck.len() {
            // landed on the tail clone of the first slide
            self.current = 1;
            effects.push(Effect::SetTransform {
                x: self.x_of(self.current),
                animate: false,
            });
        } else if self.config.infinite && target == 0 {
            // landed on the head clone of the last slide
            self.current = self.deck.len() - 2;
            effects.push(Effect::SetTransform {
                x: self.x_of(self.current),
                animate: false,
            });
        } else {
            self.current = target;
        }
        effects.push(Effect::SetActiveDot {
            slot: self.active_dot(),
        });
        effects
    }

    // ------------------------------------------------------------------
    // Autoplay and the two pause flags
    // ------------------------------------------------------------------

    /// One autoplay interval tick: advance in reading direction, but only
    /// when no transition is in flight.
    pub fn autoplay_tick(&mut self) -> Vec<Effect> {
        if !self.playing || self.phase != Phase::Idle {
            return Vec::new();
        }
        match self.config.direction {
            Direction::Ltr => self.next(),
            Direction::Rtl => self.prev(),
        }
    }

    /// Explicit resume: clears the sticky pause and starts the timer.
    pub fn play(&mut self) -> Vec<Effect> {
        self.manual_pause = false;
        self.playing = true;
        vec![Effect::StartAutoplay {
            period_ms: self.config.autoplay_period_ms(),
        }]
    }

    /// Explicit pause: sticky until the next `play`/toggle.
    pub fn pause(&mut self) -> Vec<Effect> {
        self.manual_pause = true;
        self.playing = false;
        vec![Effect::StopAutoplay]
    }

    pub fn toggle(&mut self) -> Vec<Effect> {
        if self.playing {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Hover pause is non-sticky: it never touches `manual_pause`.
    pub fn hover_enter(&mut self) -> Vec<Effect> {
        if self.config.pause_on_hover && self.playing {
            self.playing = false;
            return vec![Effect::StopAutoplay];
        }
        Vec::new()
    }

    pub fn hover_leave(&mut self) -> Vec<Effect> {
        if self.config.pause_on_hover
            && self.config.autoplay
            && !self.manual_pause
            && !self.playing
        {
            self.playing = true;
            return vec![Effect::StartAutoplay {
                period_ms: self.config.autoplay_period_ms(),
            }];
        }
        Vec::new()
    }

    // ------------------------------------------------------------------
    // Dragging
    // ------------------------------------------------------------------

    /// Pointer down on the track. Takes the transform away from whatever
    /// owned it: autoplay stops, a pending settle fallback is disarmed, and
    /// the strip snaps (unanimated) back to the current settled position. A
    /// cancelled wrap transition also gives up its transient clone.
    pub fn pointer_down(&mut self, x: f64) -> Vec<Effect> {
        if matches!(self.phase, Phase::Dragging { .. }) || self.deck.is_empty() {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.playing {
            self.playing = false;
            effects.push(Effect::StopAutoplay);
        }
        if let Phase::Transitioning { wrap, .. } = self.phase {
            effects.push(Effect::DisarmSettleFallback);
            if wrap {
                self.deck.pop_transient();
                effects.push(Effect::RemoveTransientClone);
            }
        }
        let origin_x = self.x_of(self.current);
        self.phase = Phase::Dragging {
            start_x: x,
            origin_x,
        };
        effects.push(Effect::SetTransform {
            x: origin_x,
            animate: false,
        });
        effects
    }

    /// Pointer move while dragging: offset the strip from the settled
    /// position by the raw displacement. No-op without an active drag.
    pub fn pointer_move(&mut self, x: f64) -> Vec<Effect> {
        let Phase::Dragging { start_x, origin_x } = self.phase else {
            return Vec::new();
        };
        vec![Effect::SetTransform {
            x: origin_x + (x - start_x),
            animate: false,
        }]
    }

    /// Pointer release: commit to a neighbour when the displacement clears
    /// the threshold, otherwise snap back; then restart autoplay if it is
    /// configured and not manually paused.
    pub fn pointer_up(&mut self, x: f64) -> Vec<Effect> {
        let Phase::Dragging { start_x, .. } = self.phase else {
            return Vec::new();
        };
        self.phase = Phase::Idle;
        let dx = x - start_x;
        let threshold = commit_threshold(self.geometry.slide_width);
        let mut effects = if dx <= -threshold {
            self.next()
        } else if dx >= threshold {
            self.prev()
        } else {
            Vec::new()
        };
        if effects.is_empty() {
            // boundary hard stop or a sub-threshold release: snap back
            effects = self.go_to(self.current);
        }
        if self.config.autoplay && !self.manual_pause {
            self.playing = true;
            effects.push(Effect::StartAutoplay {
                period_ms: self.config.autoplay_period_ms(),
            });
        }
        effects
    }
}
