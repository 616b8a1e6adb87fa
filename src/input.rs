//! Discrete input events and the held-key state behind them.
//!
//! The host delivers key and mouse events; [`InputState`] turns them into
//! one-off [`Command`]s and remembers which movement keys are held so the
//! world can re-apply them every tick.

use glam::Vec2;
use hashbrown::{HashMap, HashSet};

use crate::config::Keybinds;
use crate::entity::Side;

/// Raw event from the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key went down; carries the key code, e.g. `KeyD`.
    KeyDown(String),
    /// A key went up.
    KeyUp(String),
    /// Primary mouse button pressed.
    MouseDown,
    /// Primary mouse button released.
    MouseUp,
    /// Cursor moved to a screen position.
    MouseMove(Vec2),
}

/// Player action a key can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Run right while held.
    MoveForward,
    /// Run left while held.
    MoveBackward,
    /// Jump.
    Jump,
    /// Crouch while held.
    Crouch,
    /// Reload.
    Reload,
    /// Slow motion.
    SlowMotion,
    /// Aim at the nearest entity and fire once.
    AutoShoot,
}

/// One-off order produced by an input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Jump or double jump.
    Jump,
    /// Pull the legs up.
    Crouch,
    /// Stand back up.
    Uncrouch,
    /// Reload the weapon.
    Reload,
    /// Start slow motion.
    SlowMotion,
    /// Aim at the nearest entity and fire once.
    AutoShoot,
    /// Pull the trigger and arm autofire.
    Shoot,
    /// Release the trigger.
    StopShoot,
    /// Cursor moved; carries the screen position.
    Aim(Vec2),
}

/// Bindings plus the keys currently held.
#[derive(Debug, Clone)]
pub struct InputState {
    bindings: HashMap<String, Action>,
    held: HashSet<Action>,
    cursor: Vec2,
}

impl InputState {
    /// Builds the key table from `keybinds`.
    #[must_use]
    pub fn new(keybinds: &Keybinds) -> Self {
        let bindings = [
            (&keybinds.move_forward, Action::MoveForward),
            (&keybinds.move_backward, Action::MoveBackward),
            (&keybinds.jump, Action::Jump),
            (&keybinds.crouch, Action::Crouch),
            (&keybinds.reload, Action::Reload),
            (&keybinds.slow_motion, Action::SlowMotion),
            (&keybinds.auto_shoot, Action::AutoShoot),
        ]
        .into_iter()
        .map(|(code, action)| (code.clone(), action))
        .collect();
        Self {
            bindings,
            held: HashSet::new(),
            cursor: Vec2::ZERO,
        }
    }

    /// Action bound to `code`, if any.
    #[must_use]
    pub fn action_for(&self, code: &str) -> Option<Action> {
        self.bindings.get(code).copied()
    }

    /// Records `event` and returns the command it triggers.
    ///
    /// Key repeats are swallowed: only the first key-down of a press acts.
    ///
    /// # Examples
    /// ```
    /// use runngun::config::Keybinds;
    /// use runngun::input::{Command, InputEvent, InputState};
    /// let mut input = InputState::new(&Keybinds::default());
    /// let down = InputEvent::KeyDown("Space".to_owned());
    /// assert_eq!(input.handle(&down), Some(Command::Jump));
    /// assert_eq!(input.handle(&down), None);
    /// ```
    pub fn handle(&mut self, event: &InputEvent) -> Option<Command> {
        match event {
            InputEvent::KeyDown(code) => {
                let action = self.action_for(code)?;
                if !self.held.insert(action) {
                    return None;
                }
                match action {
                    Action::MoveForward | Action::MoveBackward => None,
                    Action::Jump => Some(Command::Jump),
                    Action::Crouch => Some(Command::Crouch),
                    Action::Reload => Some(Command::Reload),
                    Action::SlowMotion => Some(Command::SlowMotion),
                    Action::AutoShoot => Some(Command::AutoShoot),
                }
            }
            InputEvent::KeyUp(code) => {
                let action = self.action_for(code)?;
                let was_held = self.held.remove(&action);
                (was_held && action == Action::Crouch).then_some(Command::Uncrouch)
            }
            InputEvent::MouseDown => Some(Command::Shoot),
            InputEvent::MouseUp => Some(Command::StopShoot),
            InputEvent::MouseMove(position) => {
                self.cursor = *position;
                Some(Command::Aim(*position))
            }
        }
    }

    /// Whether `action` is currently held.
    #[must_use]
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Movement sides to apply this tick, forward first.
    #[must_use]
    pub fn held_moves(&self) -> Vec<Side> {
        let mut sides = Vec::with_capacity(2);
        if self.is_held(Action::MoveForward) {
            sides.push(Side::Right);
        }
        if self.is_held(Action::MoveBackward) {
            sides.push(Side::Left);
        }
        sides
    }

    /// Last cursor position in screen space.
    #[must_use]
    pub const fn cursor(&self) -> Vec2 {
        self.cursor
    }
}
