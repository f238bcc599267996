use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Accelerate,
    Brake,
    Restart,
    Quit,
}

impl Key {
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            "ArrowUp" | "w" | "W" => Some(Key::Accelerate),
            "ArrowDown" | "s" | "S" => Some(Key::Brake),
            "r" | "R" => Some(Key::Restart),
            "Escape" => Some(Key::Quit),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Restart,
    Quit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
    pub accelerate: bool,
    pub brake: bool,
}

impl Controls {
    pub fn steering(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }

    pub fn throttle(&self) -> f32 {
        match (self.accelerate, self.brake) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

// Letters are folded to lower case so Shift does not split one physical key.
fn physical_key(name: &str) -> String {
    if name.chars().count() == 1 {
        name.to_lowercase()
    } else {
        name.to_string()
    }
}

#[derive(Default)]
pub struct InputState {
    // physical keys, so aliases of one action are released independently
    held: HashSet<String>,
    commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, name: &str) -> bool {
        let Some(key) = Key::from_name(name) else {
            return false;
        };
        // auto-repeat arrives as more key-downs
        if self.held.insert(physical_key(name)) {
            match key {
                Key::Restart => self.commands.push(Command::Restart),
                Key::Quit => self.commands.push(Command::Quit),
                _ => {}
            }
        }
        true
    }

    pub fn key_up(&mut self, name: &str) -> bool {
        if Key::from_name(name).is_none() {
            return false;
        }
        self.held.remove(&physical_key(name));
        true
    }

    // Focus loss: the matching key-ups will never arrive.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn drain_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    fn is_held(&self, key: Key) -> bool {
        self.held.iter().any(|name| Key::from_name(name) == Some(key))
    }

    pub fn controls(&self) -> Controls {
        Controls {
            left: self.is_held(Key::Left),
            right: self.is_held(Key::Right),
            accelerate: self.is_held(Key::Accelerate),
            brake: self.is_held(Key::Brake),
        }
    }
}
