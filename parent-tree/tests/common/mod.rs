#![allow(dead_code)]
//! helper methods for the tests
use parent_tree::{Config, ParentTreeSet};
use quickcheck::{Arbitrary, Gen};
use tracing_subscriber::EnvFilter;

pub type Set = ParentTreeSet<u32, TestData>;

/// A record with a key and a payload that is not part of the identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestData {
    pub key: u32,
    pub payload: String,
}

impl TestData {
    pub fn new(key: u32, payload: &str) -> Self {
        Self {
            key,
            payload: payload.into(),
        }
    }

    pub fn key_fn(data: &TestData) -> u32 {
        data.key
    }
}

/// Keys are drawn from a small range, so that collisions are frequent
impl Arbitrary for TestData {
    fn arbitrary(g: &mut Gen) -> Self {
        let key = u32::from(u8::arbitrary(g) % 24);
        let payload = g.choose(&["one", "two", "three"]).copied().unwrap_or("one");
        Self::new(key, payload)
    }
}

/// A mutation of a parent tree set
#[derive(Debug, Clone)]
pub enum Op {
    Add(TestData),
    AddParent(TestData, TestData),
    Delete(TestData),
    DeleteTree(TestData),
    Relink(TestData, Option<TestData>),
}

impl Arbitrary for Op {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 8 {
            0 | 1 => Op::Add(Arbitrary::arbitrary(g)),
            2 | 3 | 4 => Op::AddParent(Arbitrary::arbitrary(g), Arbitrary::arbitrary(g)),
            5 => Op::Delete(Arbitrary::arbitrary(g)),
            6 => Op::DeleteTree(Arbitrary::arbitrary(g)),
            _ => Op::Relink(Arbitrary::arbitrary(g), Arbitrary::arbitrary(g)),
        }
    }
}

impl Op {
    /// Apply the op. Errors other than cycles and missing values are failures.
    pub fn apply(self, set: &mut Set) -> anyhow::Result<()> {
        match self {
            Op::Add(value) => {
                set.add(value);
            }
            Op::AddParent(value, parent) => {
                set.add_parent(value, parent);
            }
            Op::Delete(value) => {
                set.delete(&value);
            }
            Op::DeleteTree(value) => {
                set.delete_tree_at(&value)?;
            }
            Op::Relink(value, parent) => match set.relink(&value, parent) {
                Err(e) if !(e.is_not_found() || matches!(e, parent_tree::Error::Cycle(_))) => {
                    return Err(e.into())
                }
                _ => {}
            },
        }
        Ok(())
    }
}

pub fn set(config: Config) -> Set {
    ParentTreeSet::with_config(config, TestData::key_fn)
}

/// observable state of a set, in a canonical order
pub fn snapshot(set: &Set) -> Vec<(TestData, Option<u32>, Vec<u32>)> {
    let mut res = set
        .values()
        .map(|value| {
            let parent = set.parent_of(value).map(|parent| parent.key);
            let mut children = set
                .children_of(value)
                .into_iter()
                .map(|child| child.key)
                .collect::<Vec<_>>();
            children.sort_unstable();
            (value.clone(), parent, children)
        })
        .collect::<Vec<_>>();
    res.sort_by_key(|(value, _, _)| value.key);
    res
}

pub fn keys<'a>(values: impl IntoIterator<Item = &'a TestData>) -> Vec<u32> {
    let mut keys = values.into_iter().map(|value| value.key).collect::<Vec<_>>();
    keys.sort_unstable();
    keys
}

pub fn setup_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
