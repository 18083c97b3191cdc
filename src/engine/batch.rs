//! Batch driver: plans the renames of one directory.
//!
//! The driver never touches the filesystem. It sees candidate names in the
//! order the caller enumerated them and asks a [`DirectoryView`] whether a
//! name is taken. The result is a [`BatchPlan`]: accepted `(old, new)` pairs
//! plus an ordered event log for display.

use std::collections::HashSet;

use super::collision::{CollisionPolicy, CollisionScheme};
use super::transform::NameTransform;

/// Existence queries against the directory being renamed.
pub trait DirectoryView {
    /// True when an entry called `name` exists.
    fn exists(&self, name: &str) -> bool;

    /// True when `old` and `new` resolve to the same entry, as happens for
    /// case-only renames on case-insensitive filesystems.
    fn is_same_entry(&self, old: &str, new: &str) -> bool;
}

/// Something that happened while planning, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    Planned { old: String, new: String },
    Skipped(String),
    Unchanged(String),
    Warning(String),
    Collision { trace: String, resolved: bool },
    AlreadyExists { old: String, new: String },
    Unresolvable(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPlan {
    pub renames: Vec<(String, String)>,
    pub events: Vec<BatchEvent>,
    /// Set when the stop policy ended the run.
    pub aborted: bool,
}

/// Applies a transform and collision scheme to successive directories.
#[derive(Debug)]
pub struct BatchDriver {
    transform: NameTransform,
    scheme: CollisionScheme,
}

impl BatchDriver {
    pub fn new(transform: NameTransform, scheme: CollisionScheme) -> Self {
        Self { transform, scheme }
    }

    /// Reset reload-flagged rule state at a directory boundary.
    pub fn enter_directory(&mut self) {
        self.transform.reload();
    }

    pub fn plan<V: DirectoryView + ?Sized>(
        &mut self,
        candidates: &[String],
        view: &V,
    ) -> BatchPlan {
        let mut plan = BatchPlan::default();
        let mut batch: HashSet<String> = HashSet::new();

        for old in candidates {
            let Some(synthesis) = self.transform.apply(old) else {
                plan.events.push(BatchEvent::Skipped(old.clone()));
                continue;
            };
            for warning in synthesis.warnings {
                tracing::debug!("{old}: {warning}");
                plan.events.push(BatchEvent::Warning(warning));
            }

            let mut new = synthesis.name;
            if new.is_empty() {
                plan.events.push(BatchEvent::Skipped(old.clone()));
                continue;
            }
            if new == *old {
                plan.events.push(BatchEvent::Unchanged(old.clone()));
                continue;
            }

            let on_disk = view.exists(&new) && !view.is_same_entry(old, &new);
            if on_disk && self.scheme.policy != CollisionPolicy::Search {
                plan.events.push(BatchEvent::AlreadyExists {
                    old: old.clone(),
                    new,
                });
                if self.scheme.policy == CollisionPolicy::Stop {
                    plan.aborted = true;
                    break;
                }
                continue;
            }
            if on_disk || batch.contains(&new) {
                let avoidance = self
                    .scheme
                    .avoid(&new, |candidate| batch.contains(candidate) || view.exists(candidate));
                plan.events.push(BatchEvent::Collision {
                    trace: avoidance.trace,
                    resolved: avoidance.name.is_some(),
                });
                match avoidance.name {
                    Some(free) => new = free,
                    None => {
                        plan.events.push(BatchEvent::Unresolvable(old.clone()));
                        if self.scheme.policy == CollisionPolicy::Stop {
                            plan.aborted = true;
                            break;
                        }
                        continue;
                    }
                }
            }

            tracing::trace!("planned {old} -> {new}");
            plan.events.push(BatchEvent::Planned {
                old: old.clone(),
                new: new.clone(),
            });
            batch.insert(new.clone());
            plan.renames.push((old.clone(), new));
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::transform::{MatchOptions, NativeProgram, SubstituteOp};

    /// In-memory directory; `aliases` pairs names that are one entry.
    struct MemoryView {
        names: Vec<String>,
        aliases: Vec<(String, String)>,
    }

    impl MemoryView {
        fn new(names: &[&str]) -> Self {
            Self {
                names: names.iter().map(|n| n.to_string()).collect(),
                aliases: Vec::new(),
            }
        }
    }

    impl DirectoryView for MemoryView {
        fn exists(&self, name: &str) -> bool {
            self.names.iter().any(|n| n == name)
                || self.aliases.iter().any(|(_, alias)| alias == name)
        }

        fn is_same_entry(&self, old: &str, new: &str) -> bool {
            self.aliases.iter().any(|(a, b)| a == old && b == new)
        }
    }

    fn driver(filter: &str, replacement: &str, rules: &[&str], scheme: &str) -> BatchDriver {
        let program =
            NativeProgram::compile(filter, replacement, rules, &MatchOptions::default()).unwrap();
        BatchDriver::new(
            NameTransform::Native(program),
            CollisionScheme::parse(scheme).unwrap(),
        )
    }

    fn candidates(view: &MemoryView) -> Vec<String> {
        view.names.clone()
    }

    fn new_names(plan: &BatchPlan) -> Vec<&str> {
        plan.renames.iter().map(|(_, new)| new.as_str()).collect()
    }

    #[test]
    fn test_plan_renames_in_order() {
        let view = MemoryView::new(&["08493357-001.tif", "08493357-002.tif", "his-01.png"]);
        let plan = driver("08*-0*", "/hap*", &[], "").plan(&candidates(&view), &view);
        assert_eq!(new_names(&plan), vec!["hap01.tif", "hap02.tif"]);
        assert_eq!(plan.events[2], BatchEvent::Skipped("his-01.png".to_string()));
        assert!(!plan.aborted);
    }

    #[test]
    fn test_unchanged_names_are_reported() {
        let view = MemoryView::new(&["a.txt"]);
        let plan = driver("*", "*", &[], "").plan(&candidates(&view), &view);
        assert!(plan.renames.is_empty());
        assert_eq!(plan.events, vec![BatchEvent::Unchanged("a.txt".to_string())]);
    }

    /// Names queued earlier in the batch collide like names on disk
    #[test]
    fn test_in_batch_collision() {
        let view = MemoryView::new(&["a-1.txt", "b-1.txt", "c-1.txt"]);
        let plan = driver("?-*", "/x-*", &[], "").plan(&candidates(&view), &view);
        assert_eq!(new_names(&plan), vec!["x-1.txt", "x-10.txt", "x-11.txt"]);
    }

    #[test]
    fn test_disk_collision_search() {
        let view = MemoryView::new(&["his-01.png", "my-01.png"]);
        let plan = driver("my*", "his*", &[], "").plan(&candidates(&view), &view);
        assert_eq!(new_names(&plan), vec!["his-010.png"]);
        assert!(plan.events.contains(&BatchEvent::Collision {
            trace: "Name collision: his-01.png>his-010".to_string(),
            resolved: true,
        }));
    }

    #[test]
    fn test_continue_policy_skips_file() {
        let view = MemoryView::new(&["his-01.png", "my-01.png", "my-02.png"]);
        let plan = driver("my*", "his*", &[], "C").plan(&candidates(&view), &view);
        assert_eq!(new_names(&plan), vec!["his-02.png"]);
        assert!(!plan.aborted);
    }

    #[test]
    fn test_stop_policy_aborts() {
        let view = MemoryView::new(&["his-01.png", "my-01.png", "my-02.png"]);
        let plan = driver("my*", "his*", &[], "S").plan(&candidates(&view), &view);
        assert!(plan.renames.is_empty());
        assert!(plan.aborted);
        assert_eq!(
            plan.events.last(),
            Some(&BatchEvent::AlreadyExists {
                old: "my-01.png".to_string(),
                new: "his-01.png".to_string(),
            })
        );
    }

    /// A case-only rename of the same entry is not a collision
    #[test]
    fn test_same_entry_is_not_a_collision() {
        let upper = || {
            BatchDriver::new(
                NameTransform::Substitute(vec![SubstituteOp::Upper]),
                CollisionScheme::default(),
            )
        };

        let mut view = MemoryView::new(&["readme.txt"]);
        view.aliases.push(("readme.txt".to_string(), "README.TXT".to_string()));
        let plan = upper().plan(&candidates(&view), &view);
        assert_eq!(new_names(&plan), vec!["README.TXT"]);

        let view = MemoryView::new(&["readme.txt", "README.TXT"]);
        let plan = upper().plan(&["readme.txt".to_string()], &view);
        assert_eq!(new_names(&plan), vec!["README0.TXT"]);
    }

    #[test]
    fn test_exhausted_search_is_unresolvable() {
        let mut names = vec!["my-01.png".to_string(), "his-01.png".to_string()];
        names.extend((2..=11).map(|n| format!("his-{n:02}.png")));
        let view = MemoryView {
            names,
            aliases: Vec::new(),
        };
        let plan = driver("my*", "his*", &[], "M").plan(&["my-01.png".to_string()], &view);
        assert!(plan.renames.is_empty());
        assert_eq!(
            plan.events.last(),
            Some(&BatchEvent::Unresolvable("my-01.png".to_string()))
        );
    }

    /// Planning again over the renamed names changes nothing silently
    #[test]
    fn test_second_pass_over_renamed_names() {
        let view = MemoryView::new(&["08493357-001.tif", "08493357-002.tif"]);
        let first = driver("08*-0*", "/hap*", &[], "").plan(&candidates(&view), &view);
        let renamed = MemoryView::new(&new_names(&first));
        let second = driver("08*-0*", "/hap*", &[], "").plan(&candidates(&renamed), &renamed);
        assert!(second.renames.is_empty());
        assert!(second.events.iter().all(|e| matches!(e, BatchEvent::Skipped(_))));

        let view = MemoryView::new(&["cat.txt", "dog.txt"]);
        let first = driver("*.txt", "pet.txt", &[], "").plan(&candidates(&view), &view);
        assert_eq!(new_names(&first), vec!["pet.txt", "pet0.txt"]);
        let renamed = MemoryView::new(&new_names(&first));
        let second = driver("*.txt", "pet.txt", &[], "").plan(&candidates(&renamed), &renamed);
        assert_eq!(second.events[0], BatchEvent::Unchanged("pet.txt".to_string()));
        assert!(matches!(second.events[1], BatchEvent::Collision { .. }));
        assert!(second.renames.iter().all(|(old, _)| old == "pet0.txt"));
        assert!(!second.aborted);
    }

    /// Duplicates within a batch are numbered under every policy
    #[test]
    fn test_batch_duplicates_depend_on_order() {
        let forward = ["cat.txt".to_string(), "dog.txt".to_string()];
        let backward = ["dog.txt".to_string(), "cat.txt".to_string()];
        let view = MemoryView::new(&["cat.txt", "dog.txt"]);
        for policy in ["", "C", "S"] {
            let first = driver("*.txt", "pet.txt", &[], policy).plan(&forward, &view);
            let second = driver("*.txt", "pet.txt", &[], policy).plan(&backward, &view);
            assert_eq!(first.renames[1], ("dog.txt".to_string(), "pet0.txt".to_string()));
            assert_eq!(second.renames[1], ("cat.txt".to_string(), "pet0.txt".to_string()));
        }
    }
}
