//! Keyboard model. Hosts feed key transitions into [`InputState`]; once per tick the
//! game reads a [`FrameInput`] snapshot, which is also the unit scripted replays use.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_SCRIPT_FRAMES, NOMINAL_FRAME_MS, PLAYER_BOOST_HOLD_MS};
use crate::error::InputScriptError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    Left,
    Right,
    Jump,
    Attack,
    Special,
    Pause,
}

impl Key {
    pub const ALL: [Key; 6] = [
        Key::Left,
        Key::Right,
        Key::Jump,
        Key::Attack,
        Key::Special,
        Key::Pause,
    ];

    /// Accepts the action names plus the default browser bindings.
    pub fn from_name(name: &str) -> Result<Self, InputScriptError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "left" | "arrowleft" => Ok(Key::Left),
            "right" | "arrowright" => Ok(Key::Right),
            "jump" | "space" | " " | "arrowup" => Ok(Key::Jump),
            "attack" | "z" => Ok(Key::Attack),
            "special" | "x" => Ok(Key::Special),
            "pause" | "escape" | "esc" => Ok(Key::Pause),
            _ => Err(InputScriptError::UnknownKey(name.to_string())),
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump_held: bool,
    /// Direction key held long enough for the speed bonus.
    pub boost: bool,
    pub jump_pressed: bool,
    pub attack_pressed: bool,
    pub special_pressed: bool,
    pub pause_pressed: bool,
}

const BIT_LEFT: u16 = 1 << 0;
const BIT_RIGHT: u16 = 1 << 1;
const BIT_JUMP_HELD: u16 = 1 << 2;
const BIT_BOOST: u16 = 1 << 3;
const BIT_JUMP_PRESSED: u16 = 1 << 4;
const BIT_ATTACK_PRESSED: u16 = 1 << 5;
const BIT_SPECIAL_PRESSED: u16 = 1 << 6;
const BIT_PAUSE_PRESSED: u16 = 1 << 7;

impl FrameInput {
    pub const IDLE: FrameInput = FrameInput {
        left: false,
        right: false,
        jump_held: false,
        boost: false,
        jump_pressed: false,
        attack_pressed: false,
        special_pressed: false,
        pause_pressed: false,
    };

    #[inline]
    pub fn to_bits(self) -> u16 {
        (if self.left { BIT_LEFT } else { 0 })
            | (if self.right { BIT_RIGHT } else { 0 })
            | (if self.jump_held { BIT_JUMP_HELD } else { 0 })
            | (if self.boost { BIT_BOOST } else { 0 })
            | (if self.jump_pressed { BIT_JUMP_PRESSED } else { 0 })
            | (if self.attack_pressed { BIT_ATTACK_PRESSED } else { 0 })
            | (if self.special_pressed { BIT_SPECIAL_PRESSED } else { 0 })
            | (if self.pause_pressed { BIT_PAUSE_PRESSED } else { 0 })
    }

    #[inline]
    pub fn from_bits(bits: u16) -> Self {
        Self {
            left: bits & BIT_LEFT != 0,
            right: bits & BIT_RIGHT != 0,
            jump_held: bits & BIT_JUMP_HELD != 0,
            boost: bits & BIT_BOOST != 0,
            jump_pressed: bits & BIT_JUMP_PRESSED != 0,
            attack_pressed: bits & BIT_ATTACK_PRESSED != 0,
            special_pressed: bits & BIT_SPECIAL_PRESSED != 0,
            pause_pressed: bits & BIT_PAUSE_PRESSED != 0,
        }
    }
}

/// Live key map. `held` stores the timestamp of the press that started the hold;
/// `pressed` collects transitions since the last snapshot.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: [Option<f64>; 6],
    pressed: [bool; 6],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key-down. Auto-repeat while the key is already held is not a new press.
    pub fn press(&mut self, key: Key, now_ms: f64) {
        let slot = &mut self.held[key.index()];
        if slot.is_none() {
            *slot = Some(now_ms);
            self.pressed[key.index()] = true;
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held[key.index()] = None;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held[key.index()].is_some()
    }

    /// Focus loss: forget everything so no key stays stuck down.
    pub fn clear(&mut self) {
        self.held = [None; 6];
        self.pressed = [false; 6];
    }

    fn held_for(&self, key: Key, now_ms: f64) -> f64 {
        self.held[key.index()].map_or(0.0, |since| (now_ms - since).max(0.0))
    }

    /// Snapshot for one tick. Consumes the pending presses.
    pub fn frame(&mut self, now_ms: f64) -> FrameInput {
        let left = self.is_held(Key::Left);
        let right = self.is_held(Key::Right);
        let boost = (left && self.held_for(Key::Left, now_ms) >= PLAYER_BOOST_HOLD_MS)
            || (right && self.held_for(Key::Right, now_ms) >= PLAYER_BOOST_HOLD_MS);

        let input = FrameInput {
            left,
            right,
            jump_held: self.is_held(Key::Jump),
            boost,
            jump_pressed: self.pressed[Key::Jump.index()],
            attack_pressed: self.pressed[Key::Attack.index()],
            special_pressed: self.pressed[Key::Special.index()],
            pause_pressed: self.pressed[Key::Pause.index()],
        };
        self.pressed = [false; 6];
        input
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub frames: u32,
    #[serde(default)]
    pub hold: Vec<String>,
    /// Keys pressed on the first frame of the segment only.
    #[serde(default)]
    pub press: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputScript {
    pub segments: Vec<ScriptSegment>,
}

impl InputScript {
    pub fn from_json(text: &str) -> Result<Self, InputScriptError> {
        let script: InputScript =
            serde_json::from_str(text).map_err(|err| InputScriptError::Parse(err.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<(), InputScriptError> {
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.frames == 0 {
                return Err(InputScriptError::EmptySegment { index });
            }
            for name in segment.hold.iter().chain(segment.press.iter()) {
                Key::from_name(name)?;
            }
        }
        let frames = self.total_frames();
        if frames > MAX_SCRIPT_FRAMES {
            return Err(InputScriptError::TooLong {
                frames,
                max: MAX_SCRIPT_FRAMES,
            });
        }
        Ok(())
    }

    pub fn total_frames(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.frames)).sum()
    }

    /// Plays the script through an [`InputState`] at 60 Hz, so hold timing and edge
    /// detection behave exactly as with a live keyboard.
    pub fn expand(&self) -> Result<Vec<FrameInput>, InputScriptError> {
        self.validate()?;
        let mut state = InputState::new();
        let mut frames = Vec::with_capacity(self.total_frames() as usize);
        let mut tick: u64 = 0;

        for segment in &self.segments {
            let hold = parse_keys(&segment.hold)?;
            let press = parse_keys(&segment.press)?;
            let now = tick as f64 * NOMINAL_FRAME_MS as f64;

            for key in Key::ALL {
                if !hold.contains(&key) || press.contains(&key) {
                    state.release(key);
                }
            }
            for &key in hold.iter().chain(press.iter()) {
                state.press(key, now);
            }

            for frame in 0..segment.frames {
                let now = tick as f64 * NOMINAL_FRAME_MS as f64;
                frames.push(state.frame(now));
                if frame == 0 {
                    for &key in &press {
                        if !hold.contains(&key) {
                            state.release(key);
                        }
                    }
                }
                tick += 1;
            }
        }

        Ok(frames)
    }
}

fn parse_keys(names: &[String]) -> Result<Vec<Key>, InputScriptError> {
    names.iter().map(|name| Key::from_name(name)).collect()
}
