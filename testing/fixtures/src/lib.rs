//! Fixture view models.
//!
//! Struct declarations and binding code are generated from `bindery.toml`
//! by the build script; the enums, computed properties and event-call
//! methods are written here.

pub mod game {
    use std::collections::VecDeque;

    ///
    /// Class
    ///

    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub enum Class {
        #[default]
        Warrior,
        Mage,
        Rogue,
    }

    ///
    /// Perk
    ///

    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub enum Perk {
        #[default]
        Empty,
        Swift,
        Strong,
        Lucky,
    }

    ///
    /// Loot
    ///

    #[derive(Clone, Debug, PartialEq)]
    pub struct Loot {
        pub name: String,
        pub price: i32,
    }

    ///
    /// Shop
    ///

    #[derive(Debug, Default)]
    pub struct Shop {
        pub gold: i32,
        pub sold: Vec<String>,
        pub open: bool,
    }

    impl Shop {
        pub fn buy(&mut self, loot: Loot, qty: i32) -> bool {
            if qty <= 0 {
                return false;
            }

            self.gold += loot.price * qty;
            self.sold.push(loot.name);

            true
        }

        pub const fn close(&mut self) {
            self.open = false;
        }
    }

    bindery::include_bindings!("game");

    impl Entity {
        pub fn rename(&mut self, name: String) {
            self.set_name(name);
        }
    }

    impl Player {
        /// Computed; pushed whenever `Health` changes.
        #[must_use]
        pub const fn is_alive(&self) -> bool {
            self._health > 0
        }

        #[must_use]
        pub const fn rank(&self) -> &str {
            if self._level >= 10 { "Veteran" } else { "Novice" }
        }

        #[must_use]
        pub const fn entity(&self) -> &Entity {
            &self.base
        }

        pub const fn entity_mut(&mut self) -> &mut Entity {
            &mut self.base
        }

        /// Not bound; changes are never pushed.
        #[must_use]
        pub const fn secret(&self) -> i32 {
            self._secret
        }

        pub const fn set_secret(&mut self, secret: i32) {
            self._secret = secret;
        }

        /// Mana values replaced by `set_mana`, oldest first.
        #[must_use]
        pub const fn mana_history(&self) -> &VecDeque<i32> {
            &self._history
        }

        #[must_use]
        pub const fn mana_changes(&self) -> u32 {
            self._mana_changes
        }

        #[must_use]
        pub fn mana_reads(&self) -> u32 {
            self._mana_reads.get()
        }

        pub fn heal(&mut self, amount: i32) {
            self.set_health(self.health() + amount);
        }

        /// `false` when already of that class.
        pub fn respec(&mut self, class: Class) -> bool {
            if self.class() == class {
                return false;
            }
            self.set_class(class);

            true
        }

        #[must_use]
        pub fn recruit(name: String, level: i32) -> Self {
            let mut player = Self::default();
            player.base.set_name(name);
            player.set_level(level);

            player
        }

        pub fn drain_mana(&mut self, pool: &mut i32) {
            *pool += self.mana();
            self.set_mana(0);
        }

        pub fn tag_all(&mut self, tags: Vec<String>) {
            self.set_tags(tags);
        }

        #[must_use]
        pub fn pick<T: Default>(&self) -> T {
            T::default()
        }

        pub fn taunt(&mut self) {
            self.set_nickname("Taunter".into());
        }
    }

    impl Counter {
        #[must_use]
        pub const fn step(&self) -> i32 {
            self._step
        }

        pub const fn set_step(&mut self, step: i32) {
            self._step = step;
        }

        pub fn increment(&mut self) {
            let next = self.count() + self._step.max(1);
            self.set_count(next);
        }
    }

    impl Tally {
        #[must_use]
        pub const fn counter(&self) -> &Counter {
            &self.base
        }
    }

    pub mod ui {
        bindery::include_bindings!("game.ui");
    }
}

bindery::include_bindings!();
