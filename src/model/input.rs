// File: src/model/input.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A resolved quick-input request.
///
/// `offset` is `None` when the text held no leading date expression, `memo`
/// is `None` when nothing but a date (and flags) was entered.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Input {
    pub offset: Option<i64>,
    pub memo: Option<String>,
    pub flags: BTreeSet<String>,
}

impl Input {
    pub fn has_offset(&self) -> bool {
        self.offset.is_some()
    }

    pub fn has_memo(&self) -> bool {
        self.memo.as_deref().is_some_and(|m| !m.trim().is_empty())
    }

    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.iter().any(|f| f.eq_ignore_ascii_case(name))
    }

    /// Day the request targets; memos without a date go to today.
    pub fn target_offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}
