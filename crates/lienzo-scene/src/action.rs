//! Time-driven node mutators.
//!
//! An action advances by `run(elapsed, node)` each frame and reports
//! completion. Timed variants apply their configured delta
//! proportionally to the consumed time, so the total effect over the
//! action's life sums exactly to the delta regardless of frame-time
//! granularity.

use std::f32::consts::PI;
use std::fmt;
use std::rc::Rc;

use lienzo_core::{is_positive, Point, EPSILON};

use crate::node::Node;

const TWO_PI: f32 = 2.0 * PI;

/// Clamp `elapsed` to the remaining duration and count it down.
/// Returns the consumed slice and whether the countdown finished.
fn consume(elapsed: f32, duration_left: &mut f32) -> (f32, bool) {
    let consumed = elapsed.min(*duration_left);
    *duration_left -= consumed;
    (consumed, *duration_left <= 0.0)
}

/// A one-shot callback. Fires on its first run and completes
/// immediately, ignoring elapsed time.
#[derive(Clone)]
pub struct CallBack {
    callback: Rc<dyn Fn()>,
    called: bool,
}

impl CallBack {
    pub fn has_been_called(&self) -> bool {
        self.called
    }
}

impl fmt::Debug for CallBack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallBack")
            .field("called", &self.called)
            .finish_non_exhaustive()
    }
}

/// Runs its children one after another. Direction decides whether the
/// index walks forward or backward through the list.
#[derive(Debug)]
pub struct Sequence {
    actions: Vec<Action>,
    forward: bool,
    index: usize,
}

impl Sequence {
    fn new(actions: Vec<Action>, forward: bool) -> Self {
        debug_assert!(!actions.is_empty(), "actions vector is empty");

        let index = if forward { 0 } else { actions.len() - 1 };
        Self {
            actions,
            forward,
            index,
        }
    }

    fn run(&mut self, elapsed: f32, node: &mut Node) -> bool {
        if self.actions[self.index].run(elapsed, node) {
            if self.forward {
                self.index += 1;
                if self.index == self.actions.len() {
                    return true;
                }
            } else {
                if self.index == 0 {
                    return true;
                }
                self.index -= 1;
            }
        }

        false
    }
}

/// Re-clones and restarts its wrapped action. `times == 0` repeats
/// forever and never reports done.
#[derive(Debug)]
pub struct Repeat {
    action: Box<Action>,
    initial_times: u32,
    times_left: u32,
}

impl Repeat {
    fn run(&mut self, elapsed: f32, node: &mut Node) -> bool {
        if self.action.run(elapsed, node) {
            let repeat = if self.initial_times > 0 {
                self.times_left -= 1;
                self.times_left > 0
            } else {
                true
            };

            if repeat {
                self.action = Box::new(self.action.clone_action());
            }

            return !repeat;
        }

        false
    }
}

/// A time-bounded or instantaneous node mutator.
#[derive(Debug)]
pub enum Action {
    Move {
        delta: Point,
        duration: f32,
        duration_left: f32,
    },
    Rotate {
        delta_angle: f32,
        duration: f32,
        duration_left: f32,
    },
    Scale {
        delta_x: f32,
        delta_y: f32,
        duration: f32,
        duration_left: f32,
    },
    Wait {
        duration: f32,
        duration_left: f32,
    },
    CallBack(CallBack),
    Sequence(Sequence),
    Repeat(Repeat),
}

impl Action {
    /// Translate the node by `delta` over `duration` seconds.
    pub fn move_by(delta: Point, duration: f32) -> Self {
        debug_assert!(is_positive(duration), "duration must be greater than 0");

        Action::Move {
            delta,
            duration,
            duration_left: duration,
        }
    }

    /// Rotate the node by `delta_angle` radians over `duration`
    /// seconds. The node's angle wraps into `[0, 2π)` after each
    /// increment.
    pub fn rotate_by(delta_angle: f32, duration: f32) -> Self {
        debug_assert!(
            (-TWO_PI..TWO_PI).contains(&delta_angle),
            "invalid delta angle"
        );
        debug_assert!(is_positive(duration), "duration must be greater than 0");

        Action::Rotate {
            delta_angle,
            duration,
            duration_left: duration,
        }
    }

    /// Change the node's scale by the given deltas over `duration`
    /// seconds. The resulting scale never drops below the epsilon
    /// floor.
    pub fn scale_by(delta_x: f32, delta_y: f32, duration: f32) -> Self {
        debug_assert!(is_positive(duration), "duration must be greater than 0");

        Action::Scale {
            delta_x,
            delta_y,
            duration,
            duration_left: duration,
        }
    }

    /// Do nothing for `duration` seconds.
    pub fn wait(duration: f32) -> Self {
        debug_assert!(is_positive(duration), "invalid duration");

        Action::Wait {
            duration,
            duration_left: duration,
        }
    }

    pub fn callback(callback: impl Fn() + 'static) -> Self {
        Action::CallBack(CallBack {
            callback: Rc::new(callback),
            called: false,
        })
    }

    /// Run the actions in order, first to last.
    pub fn sequence(actions: Vec<Action>) -> Self {
        Action::Sequence(Sequence::new(actions, true))
    }

    /// Run the actions in order, last to first.
    pub fn sequence_backwards(actions: Vec<Action>) -> Self {
        Action::Sequence(Sequence::new(actions, false))
    }

    /// Repeat the wrapped action `times` times; 0 means forever.
    pub fn repeat(action: Action, times: u32) -> Self {
        Action::Repeat(Repeat {
            action: Box::new(action),
            initial_times: times,
            times_left: times,
        })
    }

    pub fn repeat_forever(action: Action) -> Self {
        Self::repeat(action, 0)
    }

    /// Advance by `elapsed` seconds, mutating the node. Returns whether
    /// the action has completed.
    pub fn run(&mut self, elapsed: f32, node: &mut Node) -> bool {
        match self {
            Action::Move {
                delta,
                duration,
                duration_left,
            } => {
                let (consumed, done) = consume(elapsed, duration_left);
                if !done || consumed > 0.0 {
                    let position = node.position();
                    node.set_position(Point::new(
                        position.x + consumed * delta.x / *duration,
                        position.y + consumed * delta.y / *duration,
                    ));
                }
                done
            }

            Action::Rotate {
                delta_angle,
                duration,
                duration_left,
            } => {
                let (consumed, done) = consume(elapsed, duration_left);
                if !done || consumed > 0.0 {
                    let mut angle =
                        node.rotation_angle() + consumed * *delta_angle / *duration;
                    if angle < 0.0 {
                        angle += TWO_PI;
                    } else if angle >= TWO_PI {
                        angle -= TWO_PI;
                    }
                    node.set_rotation_angle(angle);
                }
                done
            }

            Action::Scale {
                delta_x,
                delta_y,
                duration,
                duration_left,
            } => {
                let (consumed, done) = consume(elapsed, duration_left);
                if !done || consumed > 0.0 {
                    let mut scale_x = node.scale_x() + consumed * *delta_x / *duration;
                    if !is_positive(scale_x) {
                        scale_x = EPSILON;
                    }

                    let mut scale_y = node.scale_y() + consumed * *delta_y / *duration;
                    if !is_positive(scale_y) {
                        scale_y = EPSILON;
                    }

                    node.set_scale(scale_x, scale_y);
                }
                done
            }

            Action::Wait { duration_left, .. } => consume(elapsed, duration_left).1,

            Action::CallBack(callback) => {
                if !callback.called {
                    (callback.callback)();
                    callback.called = true;
                }
                true
            }

            Action::Sequence(sequence) => sequence.run(elapsed, node),

            Action::Repeat(repeat) => repeat.run(elapsed, node),
        }
    }

    /// An independent copy with fresh countdown timers.
    pub fn clone_action(&self) -> Action {
        match self {
            Action::Move {
                delta, duration, ..
            } => Action::move_by(*delta, *duration),
            Action::Rotate {
                delta_angle,
                duration,
                ..
            } => Action::rotate_by(*delta_angle, *duration),
            Action::Scale {
                delta_x,
                delta_y,
                duration,
                ..
            } => Action::scale_by(*delta_x, *delta_y, *duration),
            Action::Wait { duration, .. } => Action::wait(*duration),
            Action::CallBack(callback) => Action::CallBack(CallBack {
                callback: Rc::clone(&callback.callback),
                called: false,
            }),
            Action::Sequence(sequence) => Action::Sequence(Sequence::new(
                sequence.actions.iter().map(Action::clone_action).collect(),
                sequence.forward,
            )),
            Action::Repeat(repeat) => {
                Action::repeat(repeat.action.clone_action(), repeat.initial_times)
            }
        }
    }

    /// A fresh action producing the temporally inverse effect over the
    /// same duration. Waits and callbacks have no spatial inverse and
    /// reverse to clones of themselves.
    pub fn reversed(&self) -> Action {
        match self {
            Action::Move {
                delta, duration, ..
            } => Action::move_by(Point::new(-delta.x, -delta.y), *duration),
            Action::Rotate {
                delta_angle,
                duration,
                ..
            } => Action::rotate_by(-delta_angle, *duration),
            Action::Scale {
                delta_x,
                delta_y,
                duration,
                ..
            } => Action::scale_by(-delta_x, -delta_y, *duration),
            Action::Wait { duration, .. } => Action::wait(*duration),
            Action::CallBack(_) => self.clone_action(),
            Action::Sequence(sequence) => Action::Sequence(Sequence::new(
                sequence.actions.iter().map(Action::reversed).collect(),
                !sequence.forward,
            )),
            Action::Repeat(repeat) => {
                Action::repeat(repeat.action.reversed(), repeat.initial_times)
            }
        }
    }

    /// Whether a callback action has fired. False for every other
    /// variant.
    pub fn has_been_called(&self) -> bool {
        matches!(self, Action::CallBack(callback) if callback.called)
    }
}
