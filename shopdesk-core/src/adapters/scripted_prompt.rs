use std::sync::Mutex;

use crate::ports::Prompt;

/// Non-interactive prompt with a fixed answer
///
/// Records every question and notice so callers (and tests) can inspect
/// what the user would have seen.
pub struct ScriptedPrompt {
    answer: bool,
    confirmations: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    /// Prompt that answers every confirmation with `answer`
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            confirmations: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        if let Ok(mut confirmations) = self.confirmations.lock() {
            confirmations.push(message.to_string());
        }
        self.answer
    }

    fn notify(&self, message: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(message.to_string());
        }
    }
}
