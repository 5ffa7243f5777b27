use super::config::ConfigError;

/// One of `count` disjoint slices of a work list: the items whose position
/// modulo `count` equals `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobShard {
    index: usize,
    count: usize,
}

impl JobShard {
    pub fn new(index: usize, count: usize) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::InvalidJobCount);
        }
        if index >= count {
            return Err(ConfigError::JobIndexOutOfRange { index, count });
        }
        Ok(Self { index, count })
    }

    /// Both or neither of index and count must be present; neither means the
    /// whole list is processed by a single unsharded job.
    pub fn from_options(
        index: Option<usize>,
        count: Option<usize>,
    ) -> Result<Option<Self>, ConfigError> {
        match (index, count) {
            (None, None) => Ok(None),
            (Some(index), Some(count)) => Self::new(index, count).map(Some),
            _ => Err(ConfigError::IncompleteJobSpec),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn contains(&self, position: usize) -> bool {
        position % self.count == self.index
    }

    /// Items of `items` assigned to this shard, in their original order.
    pub fn select<'a, T>(&self, items: &'a [T]) -> impl Iterator<Item = &'a T> + 'a {
        let shard = *self;
        items
            .iter()
            .enumerate()
            .filter(move |(position, _)| shard.contains(*position))
            .map(|(_, item)| item)
    }
}

/// Selects the items of an optional shard; `None` keeps everything.
pub fn assigned<'a, T>(items: &'a [T], shard: Option<&JobShard>) -> Vec<&'a T> {
    match shard {
        Some(shard) => shard.select(items).collect(),
        None => items.iter().collect(),
    }
}

/// File name of a stage output, with `_<index>` appended to the stem for a
/// sharded run: `shard_file_name("pourbaix_data", "csv.gz", Some(&shard))`
/// gives `pourbaix_data_3.csv.gz` for shard 3.
pub fn shard_file_name(stem: &str, extension: &str, shard: Option<&JobShard>) -> String {
    match shard {
        Some(shard) => format!("{}_{}.{}", stem, shard.index, extension),
        None => format!("{}.{}", stem, extension),
    }
}
