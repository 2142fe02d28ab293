//! Per-column tally of comparisons seen during one WHERE analysis

/// Comparison history of one column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorCounter {
    eq: u32,
    lt: u32,
    gt: u32,
}

impl OperatorCounter {
    pub fn eq_count(&self) -> u32 {
        self.eq
    }

    /// LT and LTE
    pub fn lt_count(&self) -> u32 {
        self.lt
    }

    /// GT and GTE
    pub fn gt_count(&self) -> u32 {
        self.gt
    }

    pub fn increase_eq(&mut self) {
        self.eq += 1;
    }

    pub fn increase_lt(&mut self) {
        self.lt += 1;
    }

    pub fn increase_gt(&mut self) {
        self.gt += 1;
    }

    /// True once any comparison has been recorded
    pub fn is_constrained(&self) -> bool {
        self.eq > 0 || self.lt > 0 || self.gt > 0
    }
}

/// One counter per catalog column, indexed by column position
#[derive(Debug, Clone, Default)]
pub struct OpCounters {
    counters: Vec<OperatorCounter>,
}

impl OpCounters {
    pub fn new(num_columns: usize) -> Self {
        Self {
            counters: vec![OperatorCounter::default(); num_columns],
        }
    }

    pub fn get(&self, index: usize) -> OperatorCounter {
        self.counters[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut OperatorCounter {
        &mut self.counters[index]
    }

    /// Number of columns in `range` with at least one EQ
    pub fn eq_columns(&self, range: std::ops::Range<usize>) -> usize {
        self.counters[range].iter().filter(|c| c.eq > 0).count()
    }
}
