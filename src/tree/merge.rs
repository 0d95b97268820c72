//! Key-wise merge of configuration sections.
//!
//! - Sections on both sides: merged recursively
//! - Lists and scalars: replaced entirely by the source, whatever their kinds
//! - A section meeting a non-section: type conflict
//!
//! Keys new to the target are appended in source order; existing keys keep
//! their position.

use super::join_path;
use crate::error::{ConfigError, Result};
use crate::node::{Node, Section, SectionRef};

/// Merge an owned, unshared `source` into `target`.
///
/// Runs a validation pass first so a conflict anywhere leaves `target`
/// untouched.
pub(super) fn merge_section(target: &SectionRef, source: Section, prefix: &str) -> Result<()> {
    check_conflicts(target, &source, prefix)?;
    apply(target, source);
    Ok(())
}

fn check_conflicts(target: &SectionRef, source: &Section, prefix: &str) -> Result<()> {
    let target = target.read();
    for (key, incoming) in source {
        let Some(existing) = target.get(key) else {
            continue;
        };
        match (existing, incoming) {
            (Node::Section(existing), Node::Section(nested)) => {
                check_conflicts(existing, &nested.read(), &join_path(prefix, key))?;
            }
            (Node::Section(_), _) | (_, Node::Section(_)) => {
                return Err(ConfigError::type_conflict(
                    join_path(prefix, key),
                    incoming.kind(),
                    existing.kind(),
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

fn apply(target: &SectionRef, source: Section) {
    let mut target = target.write();
    for (key, incoming) in source {
        let existing = match (target.get(&key), &incoming) {
            (Some(Node::Section(existing)), Node::Section(_)) => Some(existing.clone()),
            _ => None,
        };
        match (existing, incoming) {
            (Some(existing), Node::Section(nested)) => {
                let nested = std::mem::take(&mut *nested.write());
                apply(&existing, nested);
            }
            (_, incoming) => {
                target.insert(key, incoming);
            }
        }
    }
}
