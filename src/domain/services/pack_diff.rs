//! Semantic pack diff
//!
//! Compares the canonical renderings of two packs, so formatting, comments
//! and fragment layout never show up as changes.

use similar::{ChangeTag, TextDiff};

use crate::domain::entities::CompiledPolicyPack;
use crate::domain::services::fingerprint::canonical_text;

/// Type of change in a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTag {
    Delete,
    Insert,
    Equal,
}

impl From<ChangeTag> for DiffTag {
    fn from(tag: ChangeTag) -> Self {
        match tag {
            ChangeTag::Delete => DiffTag::Delete,
            ChangeTag::Insert => DiffTag::Insert,
            ChangeTag::Equal => DiffTag::Equal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub tag: DiffTag,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct PackDiff {
    pub lines: Vec<DiffLine>,
    pub additions: usize,
    pub deletions: usize,
    /// Unified diff with three lines of context.
    pub unified: String,
}

impl PackDiff {
    pub fn between(old: &CompiledPolicyPack, new: &CompiledPolicyPack) -> Self {
        let old_label = format!("{}@{}", old.config_id(), old.config_version());
        let new_label = format!("{}@{}", new.config_id(), new.config_version());
        Self::of_text(
            &canonical_text(old.contents()),
            &canonical_text(new.contents()),
            &old_label,
            &new_label,
        )
    }

    pub fn of_text(old: &str, new: &str, old_label: &str, new_label: &str) -> Self {
        let diff = TextDiff::from_lines(old, new);
        let mut result = PackDiff::default();

        for change in diff.iter_all_changes() {
            let tag = DiffTag::from(change.tag());
            match tag {
                DiffTag::Insert => result.additions += 1,
                DiffTag::Delete => result.deletions += 1,
                DiffTag::Equal => {}
            }
            result.lines.push(DiffLine {
                tag,
                content: change.value().trim_end_matches('\n').to_string(),
            });
        }

        if result.has_changes() {
            result.unified = diff
                .unified_diff()
                .context_radius(3)
                .header(old_label, new_label)
                .to_string();
        }
        result
    }

    pub fn has_changes(&self) -> bool {
        self.additions > 0 || self.deletions > 0
    }

    /// e.g. "+5, -3"
    pub fn summary(&self) -> String {
        format!("+{}, -{}", self.additions, self.deletions)
    }
}
