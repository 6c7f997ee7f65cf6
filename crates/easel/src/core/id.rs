use slotmap::new_key_type;

new_key_type! {
    /// Handle to a node in a [`Tree`](crate::Tree) arena. Stale handles are
    /// detected rather than aliasing a reused slot.
    pub struct NodeId;
}
