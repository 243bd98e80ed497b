//! Partitions (named label timelines) and schemas (ordered partitions).

use serde::{Deserialize, Serialize};

use crate::label::Label;

/// Substitute for a partition that has no counterpart in the other schema.
static EMPTY_PARTITION: Partition = Partition::empty();

/// A named, ordered sequence of labels sharing one timeline.
///
/// Iteration order is significant: matching is first-fit, so reordering the
/// labels of a partition changes comparison results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    pub id: String,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Partition {
    /// Creates an empty partition with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            labels: Vec::new(),
        }
    }

    const fn empty() -> Self {
        Self {
            id: String::new(),
            labels: Vec::new(),
        }
    }

    /// Creates a partition keeping `labels` in the order given.
    pub fn with_labels(id: impl Into<String>, labels: Vec<Label>) -> Self {
        Self {
            id: id.into(),
            labels,
        }
    }

    /// Inserts a label in offset order, after any label with an equal offset.
    pub fn insert(&mut self, label: Label) {
        let at = self
            .labels
            .partition_point(|existing| existing.offset() <= label.offset());
        self.labels.insert(at, label);
    }

    /// Appends a label at the end regardless of its offset.
    pub fn push(&mut self, label: Label) {
        self.labels.push(label);
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Label> {
        self.labels.iter()
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

/// An analysis schema: one analysis of a piece, split into partitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub partitions: Vec<Partition>,
}

impl Schema {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            partitions: Vec::new(),
        }
    }

    /// Appends a partition and returns a handle to it.
    pub fn add_partition(&mut self, partition: Partition) -> &mut Partition {
        self.partitions.push(partition);
        let last = self.partitions.len() - 1;
        &mut self.partitions[last]
    }

    /// All labels of all partitions, partition by partition.
    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.partitions.iter().flat_map(Partition::iter)
    }

    /// Total number of labels across partitions.
    pub fn label_count(&self) -> usize {
        self.partitions.iter().map(Partition::len).sum()
    }
}

/// Finds the partition of `schema` whose id equals `part.id`.
///
/// When several partitions share the id the last one wins. When none does,
/// an empty partition stands in so that every comparison has a counterpart.
pub fn matching_partition<'a>(part: &Partition, schema: &'a Schema) -> &'a Partition {
    match schema.partitions.iter().rfind(|p| p.id == part.id) {
        Some(found) => found,
        None => {
            tracing::debug!(partition = %part.id, schema = %schema.id, "no matching partition, using an empty one");
            &EMPTY_PARTITION
        }
    }
}
