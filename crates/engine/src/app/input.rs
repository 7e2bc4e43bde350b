#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    CameraUp,
    CameraDown,
    CameraLeft,
    CameraRight,
    Quit,
}

const ACTION_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::CameraUp => 0,
            InputAction::CameraDown => 1,
            InputAction::CameraLeft => 2,
            InputAction::CameraRight => 3,
            InputAction::Quit => 4,
        }
    }
}

/// One-shot keyboard commands, reported on the tick their key goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKey {
    Save,
    Load,
    ClearSave,
    BuySeed,
    BuyTool,
    SellProduce,
}

const COMMAND_COUNT: usize = 6;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CommandStates {
    pressed: [bool; COMMAND_COUNT],
}

impl CommandStates {
    pub(crate) fn set(&mut self, command: CommandKey, pressed: bool) {
        self.pressed[command.index()] = pressed;
    }

    pub(crate) fn is_pressed(&self, command: CommandKey) -> bool {
        self.pressed[command.index()]
    }
}

impl CommandKey {
    const fn index(self) -> usize {
        match self {
            CommandKey::Save => 0,
            CommandKey::Load => 1,
            CommandKey::ClearSave => 2,
            CommandKey::BuySeed => 3,
            CommandKey::BuyTool => 4,
            CommandKey::SellProduce => 5,
        }
    }
}
