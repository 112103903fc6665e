//! Task data structure.
//!
//! A `Task` is a plain value record. New tasks are only built by the
//! [`TaskStore`](crate::store::TaskStore), either through `create` or while
//! loading the task file.

use std::fmt;

use serde::Serialize;

use crate::fields::{format_priority, Category};

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub high_priority: bool,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} | {} | {} | {}",
            self.id,
            self.name,
            self.description,
            self.category,
            format_priority(self.high_priority)
        )
    }
}
