// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git integration module.
//!
//! The pipeline only reads from version control, through [`VcsReader`].

pub mod diff;
mod memory;
mod reader;
mod repo;

pub use diff::{render_name_status, NameStatusEntry};
pub use memory::InMemoryRepository;
pub use reader::{VcsReader, WORKING_TREE};
pub use repo::GitRepository;
