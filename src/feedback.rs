use std::io::Write;
use std::sync::Arc;

/// Interaction cue fired on firearm selection and attachment toggles
pub trait ClickFeedback: Send + Sync {
    fn click(&self);
}

/// Rings the terminal bell on stderr
pub struct TerminalBell;

impl ClickFeedback for TerminalBell {
    fn click(&self) {
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}

pub struct SilentFeedback;

impl ClickFeedback for SilentFeedback {
    fn click(&self) {}
}

/// Pick the feedback implementation for `interface.click_sound`
pub fn from_config(click_sound: bool) -> Arc<dyn ClickFeedback> {
    if click_sound {
        Arc::new(TerminalBell)
    } else {
        Arc::new(SilentFeedback)
    }
}
