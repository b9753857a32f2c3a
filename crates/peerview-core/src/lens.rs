//! Lenses embedding a child scope's state inside its parent's state.
//!
//! A parent stores the child's last snapshot in an `Option` slot. The child
//! sees a full state value: its own fields from the snapshot (or a default
//! seeded from the parent when the slot is empty) overlaid with the fields
//! the parent owns and the child only mirrors (identity, avatar, visibility).
//!
//! Writing back does two things: the parent folds in the fields it derives
//! from the child (update counters, session timestamps), and the snapshot
//! slot is replaced, with the mirrored fields re-derived from the parent so
//! that child-side writes to them never stick.
//!
//! Invariant: the mirrored fields and the fields read by `fold_back` are
//! disjoint. Under it, `set(P, get(set(P, C))) == set(P, C)`.

/// Bidirectional accessor between a parent state and one child state.
pub trait Lens: Copy + 'static {
    type Parent: Clone + 'static;
    type Child: Clone + 'static;
    /// The parent-owned fields the child mirrors.
    type Shared;

    /// Projects the parent-owned fields the child mirrors.
    fn derive_shared(&self, parent: &Self::Parent) -> Self::Shared;

    /// Child-owned fields for a child with no snapshot yet.
    fn default_local(&self, parent: &Self::Parent) -> Self::Child;

    /// Writes the mirrored fields into a child state.
    fn overlay(&self, child: &mut Self::Child, shared: Self::Shared);

    fn snapshot<'a>(&self, parent: &'a Self::Parent) -> Option<&'a Self::Child>;

    /// Copies the fields the parent derives from the child into the parent.
    fn fold_back(&self, parent: &mut Self::Parent, child: &Self::Child);

    /// Replaces the snapshot slot.
    fn store(&self, parent: &mut Self::Parent, child: Self::Child);

    /// Child view of `parent`.
    fn get(&self, parent: &Self::Parent) -> Self::Child {
        let mut child = match self.snapshot(parent) {
            Some(snapshot) => snapshot.clone(),
            None => self.default_local(parent),
        };
        self.overlay(&mut child, self.derive_shared(parent));
        child
    }

    /// Parent after the child reduced to `child`.
    fn set(&self, mut parent: Self::Parent, mut child: Self::Child) -> Self::Parent {
        self.fold_back(&mut parent, &child);
        self.overlay(&mut child, self.derive_shared(&parent));
        self.store(&mut parent, child);
        parent
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Parent {
        pub(crate) self_id: String,
        pub(crate) visible: bool,
        pub(crate) num_of_updates: u32,
        pub(crate) child: Option<Child>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Child {
        pub(crate) self_id: String,
        pub(crate) visible: bool,
        pub(crate) num_of_updates: u32,
        pub(crate) draft: String,
    }

    #[derive(Debug, Clone, Copy)]
    pub(crate) struct ChildLens;

    impl Lens for ChildLens {
        type Parent = Parent;
        type Child = Child;
        type Shared = (String, bool);

        fn derive_shared(&self, parent: &Parent) -> (String, bool) {
            (parent.self_id.clone(), parent.visible)
        }

        fn default_local(&self, parent: &Parent) -> Child {
            Child {
                self_id: String::new(),
                visible: false,
                num_of_updates: parent.num_of_updates,
                draft: String::new(),
            }
        }

        fn overlay(&self, child: &mut Child, (self_id, visible): (String, bool)) {
            child.self_id = self_id;
            child.visible = visible;
        }

        fn snapshot<'a>(&self, parent: &'a Parent) -> Option<&'a Child> {
            parent.child.as_ref()
        }

        fn fold_back(&self, parent: &mut Parent, child: &Child) {
            parent.num_of_updates = child.num_of_updates;
        }

        fn store(&self, parent: &mut Parent, child: Child) {
            parent.child = Some(child);
        }
    }

    fn arb_child() -> impl Strategy<Value = Child> {
        ("[a-z]{0,4}", any::<bool>(), 0u32..50, "[a-z]{0,4}").prop_map(
            |(self_id, visible, num_of_updates, draft)| Child {
                self_id,
                visible,
                num_of_updates,
                draft,
            },
        )
    }

    fn arb_parent() -> impl Strategy<Value = Parent> {
        (
            "[a-z]{0,4}",
            any::<bool>(),
            0u32..50,
            proptest::option::of(arb_child()),
        )
            .prop_map(|(self_id, visible, num_of_updates, child)| Parent {
                self_id,
                visible,
                num_of_updates,
                child,
            })
    }

    proptest! {
        #[test]
        fn test_set_get_set_is_idempotent(parent in arb_parent(), child in arb_child()) {
            let once = ChildLens.set(parent, child);
            let twice = ChildLens.set(once.clone(), ChildLens.get(&once));
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_default_child_mirrors_parent(parent in arb_parent()) {
            let parent = Parent { child: None, ..parent };
            let child = ChildLens.get(&parent);
            prop_assert_eq!(child.self_id, parent.self_id);
            prop_assert_eq!(child.visible, parent.visible);
            prop_assert_eq!(child.num_of_updates, parent.num_of_updates);
        }
    }

    #[test]
    fn test_child_writes_to_shared_fields_do_not_stick() {
        let parent = Parent {
            self_id: "@me".into(),
            visible: true,
            num_of_updates: 0,
            child: None,
        };
        let mut child = ChildLens.get(&parent);
        child.self_id = "@someone-else".into();
        child.num_of_updates = 4;

        let parent = ChildLens.set(parent, child);
        assert_eq!(parent.num_of_updates, 4);
        assert_eq!(parent.child.as_ref().unwrap().self_id, "@me");
    }

    #[test]
    fn test_get_follows_parent_after_set() {
        let parent = Parent {
            self_id: "@me".into(),
            visible: false,
            num_of_updates: 0,
            child: None,
        };
        let parent = ChildLens.set(parent.clone(), ChildLens.get(&parent));
        let parent = Parent {
            visible: true,
            ..parent
        };
        assert!(ChildLens.get(&parent).visible);
    }
}
