use crate::border::messages::LoopRequest;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub win: bool,
}

impl Modifiers {
    /// `MOD_*` flags as accepted by `RegisterHotKey`.
    pub fn to_bits(self) -> u32 {
        let mut bits = 0;
        if self.alt {
            bits |= 0x0001;
        }
        if self.ctrl {
            bits |= 0x0002;
        }
        if self.shift {
            bits |= 0x0004;
        }
        if self.win {
            bits |= 0x0008;
        }
        bits
    }
}

/// A global key chord: modifiers plus one virtual-key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    pub key: u32,
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.modifiers.shift {
            write!(f, "Shift+")?;
        }
        if self.modifiers.alt {
            write!(f, "Alt+")?;
        }
        if self.modifiers.win {
            write!(f, "Win+")?;
        }
        write!(f, "0x{:02X}", self.key)
    }
}

/// Parse a hotkey string like "Ctrl+Shift+Q" into a [`Hotkey`].
pub fn parse_hotkey(s: &str) -> Option<Hotkey> {
    let mut modifiers = Modifiers::default();
    let mut key: Option<u32> = None;

    for part in s.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" => modifiers.ctrl = true,
            "SHIFT" => modifiers.shift = true,
            "ALT" => modifiers.alt = true,
            "WIN" | "SUPER" => modifiers.win = true,
            "" => {}
            other => {
                if key.is_some() {
                    return None;
                }
                key = Some(virtual_key_from_string(other)?);
            }
        }
    }

    key.map(|key| Hotkey { modifiers, key })
}

/// Map a key name to its Windows virtual-key code.
pub fn virtual_key_from_string(key: &str) -> Option<u32> {
    let upper = key.trim().to_ascii_uppercase();
    if upper.len() == 1 {
        let c = upper.as_bytes()[0];
        if c.is_ascii_uppercase() || c.is_ascii_digit() {
            return Some(c as u32);
        }
    }
    if let Some(n) = upper.strip_prefix('F').and_then(|n| n.parse::<u32>().ok()) {
        return (1..=24).contains(&n).then_some(0x6F + n);
    }
    if let Some(n) = upper.strip_prefix("NUMPAD").and_then(|n| n.parse::<u32>().ok()) {
        return (n <= 9).then_some(0x60 + n);
    }
    match upper.as_str() {
        "UP" => Some(0x26),
        "DOWN" => Some(0x28),
        "LEFT" => Some(0x25),
        "RIGHT" => Some(0x27),

        "BACKSPACE" => Some(0x08),
        "TAB" => Some(0x09),
        "ENTER" | "RETURN" => Some(0x0D),
        "PAUSE" => Some(0x13),
        "CAPSLOCK" => Some(0x14),
        "ESC" | "ESCAPE" => Some(0x1B),
        "SPACE" => Some(0x20),
        "PAGEUP" => Some(0x21),
        "PAGEDOWN" => Some(0x22),
        "END" => Some(0x23),
        "HOME" => Some(0x24),
        "INSERT" => Some(0x2D),
        "DELETE" => Some(0x2E),

        "OEM_PLUS" => Some(0xBB),
        "OEM_COMMA" => Some(0xBC),
        "OEM_MINUS" => Some(0xBD),
        "OEM_PERIOD" => Some(0xBE),

        "PRINTSCREEN" => Some(0x2C),
        "SCROLLLOCK" => Some(0x91),
        _ => None,
    }
}

/// One registered chord and the request it posts.
pub type HotkeyBinding = (Hotkey, LoopRequest);

#[cfg(windows)]
mod platform {
    use super::HotkeyBinding;
    use crate::border::messages::LoopHandle;
    use anyhow::{anyhow, Result};
    use std::thread::JoinHandle;
    use std::time::Duration;
    use windows::Win32::Foundation::{LPARAM, WPARAM};
    use windows::Win32::System::Threading::GetCurrentThreadId;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_NOREPEAT,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        GetMessageW, PeekMessageW, PostThreadMessageW, MSG, PM_NOREMOVE, WM_HOTKEY, WM_QUIT,
    };

    /// Registers global hotkeys on a dedicated message thread.
    #[derive(Debug)]
    pub struct HotkeyListener {
        thread_id: u32,
        join: Option<JoinHandle<()>>,
    }

    impl HotkeyListener {
        pub fn spawn(bindings: Vec<HotkeyBinding>, handle: LoopHandle) -> Result<Self> {
            let (ready_tx, ready_rx) = std::sync::mpsc::sync_channel::<u32>(1);

            let join = std::thread::spawn(move || {
                let mut msg = MSG::default();
                unsafe {
                    let _ = PeekMessageW(&mut msg, None, 0, 0, PM_NOREMOVE);
                }
                let thread_id = unsafe { GetCurrentThreadId() };

                let mut registered = Vec::new();
                for (id, (hotkey, _)) in bindings.iter().enumerate() {
                    let id = id as i32 + 1;
                    let modifiers = HOT_KEY_MODIFIERS(hotkey.modifiers.to_bits() | MOD_NOREPEAT.0);
                    if unsafe { RegisterHotKey(None, id, modifiers, hotkey.key) }.is_ok() {
                        tracing::info!("registered hotkey {hotkey} with ID {id}");
                        registered.push(id);
                    } else {
                        tracing::error!("failed to register hotkey {hotkey}");
                    }
                }
                let _ = ready_tx.send(thread_id);

                loop {
                    let r = unsafe { GetMessageW(&mut msg, None, 0, 0) };
                    if r.0 <= 0 {
                        break;
                    }
                    if msg.message == WM_HOTKEY {
                        let index = (msg.wParam.0 as usize).wrapping_sub(1);
                        if let Some((hotkey, request)) = bindings.get(index) {
                            tracing::debug!("hotkey {hotkey} pressed");
                            if !handle.post(request.clone()) {
                                break;
                            }
                        }
                    }
                }

                for id in registered {
                    unsafe {
                        let _ = UnregisterHotKey(None, id);
                    }
                }
            });

            let thread_id = ready_rx
                .recv_timeout(Duration::from_secs(2))
                .map_err(|_| anyhow!("hotkey thread did not signal readiness"))?;

            Ok(Self {
                thread_id,
                join: Some(join),
            })
        }

        pub fn stop(&mut self) {
            if let Some(join) = self.join.take() {
                unsafe {
                    let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
                }
                let _ = join.join();
            }
        }
    }

    impl Drop for HotkeyListener {
        fn drop(&mut self) {
            self.stop();
        }
    }
}

#[cfg(windows)]
pub use platform::HotkeyListener;

#[cfg(not(windows))]
#[derive(Debug)]
pub struct HotkeyListener;

#[cfg(not(windows))]
impl HotkeyListener {
    pub fn spawn(
        bindings: Vec<HotkeyBinding>,
        _handle: crate::border::messages::LoopHandle,
    ) -> anyhow::Result<Self> {
        if !bindings.is_empty() {
            tracing::warn!("global hotkeys are unavailable on this platform");
        }
        Ok(Self)
    }

    pub fn stop(&mut self) {}
}
