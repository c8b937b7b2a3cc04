/// Policy knobs for a [ParentTreeSet](crate::ParentTreeSet)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// remove the stored value together with the node on delete
    ///
    /// When this is false, a deleted value stays retrievable by key via
    /// [get](crate::ParentTreeSet::get), but is no longer
    /// [contained](crate::ParentTreeSet::contains) since the node is gone.
    pub purge_values: bool,
    /// capacity hint for the node and value maps
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            purge_values: true,
            initial_capacity: 0,
        }
    }
}

impl Config {
    /// config that keeps values of deleted nodes around
    pub fn retain_values() -> Self {
        Self {
            purge_values: false,
            ..Self::default()
        }
    }

    pub fn with_capacity(self, initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..self
        }
    }
}
