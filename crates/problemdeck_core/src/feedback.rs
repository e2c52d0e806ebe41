//! Transient notices and the confirmation seam shared by all controllers.

use crate::constants::NOTICE_LIMIT;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short user-facing outcome message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Bounded queue of notices waiting to be shown by the view.
#[derive(Debug, Default, Clone)]
pub struct Notices {
    queue: VecDeque<Notice>,
}

impl Notices {
    /// Queue a success notice.
    pub fn success(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Success, text.into());
    }

    /// Queue an error notice.
    ///
    /// An identical notice directly before it is not repeated, and the
    /// oldest notice is dropped beyond `NOTICE_LIMIT` entries.
    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeLevel::Error, text.into());
    }

    fn push(&mut self, level: NoticeLevel, text: String) {
        if let Some(last) = self.queue.back() {
            if last.level == level && last.text == text {
                return;
            }
        }
        self.queue.push_back(Notice { level, text });
        while self.queue.len() > NOTICE_LIMIT {
            self.queue.pop_front();
        }
    }

    /// Most recent notice, if any.
    pub fn last(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Drain all queued notices, oldest first.
    pub fn take(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}
