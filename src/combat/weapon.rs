//! Fire-control state machine.
//!
//! `Ready -> CoolingDown -> Ready` after every shot and
//! `Ready | CoolingDown -> Reloading -> Ready` when the magazine is empty or
//! a reload is requested. The weapon only tracks state; the world applies
//! recoil, spawns the projectile and schedules the timed transitions.

use log::debug;

use crate::config::WeaponSpec;

/// Result of pulling the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// One round left the barrel.
    Fired,
    /// The magazine was empty; a reload started instead.
    Reload,
    /// Reloading, cooling down, or an automatic re-trigger without autofire.
    Blocked,
}

/// A weapon instance owned by one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    spec: WeaponSpec,
    ammo: u32,
    is_reloading: bool,
    can_shoot: bool,
    autofire: bool,
}

impl Weapon {
    /// Creates a loaded weapon.
    #[must_use]
    pub fn new(spec: WeaponSpec) -> Self {
        Self {
            ammo: spec.max_ammo,
            spec,
            is_reloading: false,
            can_shoot: true,
            autofire: false,
        }
    }

    /// Static description.
    #[must_use]
    pub const fn spec(&self) -> &WeaponSpec {
        &self.spec
    }

    /// Rounds left in the magazine.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Whether a reload is in progress.
    #[must_use]
    pub const fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    /// Whether the cooldown has elapsed.
    #[must_use]
    pub const fn can_shoot(&self) -> bool {
        self.can_shoot
    }

    /// Whether holding the trigger keeps firing.
    #[must_use]
    pub const fn autofire(&self) -> bool {
        self.autofire
    }

    /// Pulls the trigger. `auto` marks a re-trigger from the autofire chain.
    ///
    /// # Examples
    /// ```
    /// use runngun::combat::{TriggerOutcome, Weapon};
    /// use runngun::config::WeaponSpec;
    /// let mut weapon = Weapon::new(WeaponSpec::assault_rifle());
    /// assert_eq!(weapon.trigger(false), TriggerOutcome::Fired);
    /// assert_eq!(weapon.trigger(false), TriggerOutcome::Blocked);
    /// weapon.cooldown_elapsed();
    /// assert_eq!(weapon.ammo(), 9);
    /// ```
    pub fn trigger(&mut self, auto: bool) -> TriggerOutcome {
        if self.is_reloading || !self.can_shoot || (auto && !self.autofire) {
            return TriggerOutcome::Blocked;
        }
        if self.ammo == 0 {
            self.start_reload();
            return TriggerOutcome::Reload;
        }
        self.ammo -= 1;
        self.can_shoot = false;
        if !auto {
            self.autofire = true;
        }
        TriggerOutcome::Fired
    }

    /// Disarms the autofire chain.
    pub fn stop_shoot(&mut self) {
        self.autofire = false;
    }

    /// Starts reloading. Returns `false` if a reload is already running.
    pub fn start_reload(&mut self) -> bool {
        if self.is_reloading {
            return false;
        }
        debug!("{} reloading", self.spec.name);
        self.is_reloading = true;
        true
    }

    /// Completes a reload, refilling the magazine.
    pub fn finish_reload(&mut self) {
        self.ammo = self.spec.max_ammo;
        self.is_reloading = false;
        debug!("{} reloaded", self.spec.name);
    }

    /// Ends the cooldown after a shot.
    pub fn cooldown_elapsed(&mut self) {
        self.can_shoot = true;
    }
}
