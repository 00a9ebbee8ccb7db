//! A personal task list with a plain-text import/export format.
//!
//! [`ops::store::TaskStore`] owns the list and applies [`ops::task_ops::Command`]s
//! through a pure transition function; persistence is a commit hook
//! ([`io::persist::Persist`]) over any [`io::kv_store::KvStore`].

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
