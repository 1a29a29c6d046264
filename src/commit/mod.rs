// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Conventional commit messages.

mod message;

pub use message::{normalize_subject, CommitMessage, MAX_SUBJECT_LENGTH};
