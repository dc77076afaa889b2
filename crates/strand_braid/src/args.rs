//! Port classification for [`braid`](crate::braid).

use strand_config::BraidConfig;

/// How each port name of the braided circuits is combined.
///
/// Names not placed in any bucket are joined, except clock-category inputs,
/// which are forked while [`fork_clocks`](Self::fork_clocks) is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BraidArgs {
    /// Broadcast one fresh value to every circuit's port.
    pub fork: Vec<String>,
    /// Expose every circuit's port as one array.
    pub join: Vec<String>,
    /// Concatenate every circuit's array port into one flat array.
    pub flat: Vec<String>,
    /// `(input, output)` pairs chained left to right.
    pub fold: Vec<(String, String)>,
    /// `(input, output)` pairs chained right to left.
    pub rfold: Vec<(String, String)>,
    /// Like `fold`, exposing every output.
    pub scan: Vec<(String, String)>,
    /// Like `rfold`, exposing every output.
    pub rscan: Vec<(String, String)>,
    /// Fork unclassified clock-category inputs.
    pub fork_clocks: bool,
}

impl Default for BraidArgs {
    fn default() -> Self {
        Self {
            fork: Vec::new(),
            join: Vec::new(),
            flat: Vec::new(),
            fold: Vec::new(),
            rfold: Vec::new(),
            scan: Vec::new(),
            rscan: Vec::new(),
            fork_clocks: true,
        }
    }
}

impl BraidArgs {
    /// No explicit buckets: join everything, fork clocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults taken from the `[braid]` section of `strand.toml`.
    pub fn from_config(config: &BraidConfig) -> Self {
        Self {
            fork_clocks: config.fork_clocks,
            ..Self::default()
        }
    }

    /// Adds a name to the fork bucket.
    pub fn fork(mut self, name: &str) -> Self {
        self.fork.push(name.to_string());
        self
    }

    /// Adds a name to the join bucket.
    pub fn join(mut self, name: &str) -> Self {
        self.join.push(name.to_string());
        self
    }

    /// Adds a name to the flat bucket.
    pub fn flat(mut self, name: &str) -> Self {
        self.flat.push(name.to_string());
        self
    }

    /// Chains `oarg` of each circuit into `iarg` of the next.
    pub fn fold(mut self, iarg: &str, oarg: &str) -> Self {
        self.fold.push((iarg.to_string(), oarg.to_string()));
        self
    }

    /// Chains `oarg` of each circuit into `iarg` of the previous.
    pub fn rfold(mut self, iarg: &str, oarg: &str) -> Self {
        self.rfold.push((iarg.to_string(), oarg.to_string()));
        self
    }

    /// Like [`fold`](Self::fold), exposing all outputs.
    pub fn scan(mut self, iarg: &str, oarg: &str) -> Self {
        self.scan.push((iarg.to_string(), oarg.to_string()));
        self
    }

    /// Like [`rfold`](Self::rfold), exposing all outputs.
    pub fn rscan(mut self, iarg: &str, oarg: &str) -> Self {
        self.rscan.push((iarg.to_string(), oarg.to_string()));
        self
    }

    /// Sets whether unclassified clock inputs are forked.
    pub fn fork_clocks(mut self, on: bool) -> Self {
        self.fork_clocks = on;
        self
    }

    /// Every `(name, bucket)` slot, chain buckets first in precedence order.
    pub(crate) fn slots(&self) -> Vec<(&str, &'static str)> {
        let mut slots = Vec::new();
        for (bucket, pairs) in [
            ("fold", &self.fold),
            ("rfold", &self.rfold),
            ("scan", &self.scan),
            ("rscan", &self.rscan),
        ] {
            for (i, o) in pairs {
                slots.push((i.as_str(), bucket));
                slots.push((o.as_str(), bucket));
            }
        }
        for (bucket, names) in [("fork", &self.fork), ("join", &self.join), ("flat", &self.flat)] {
            slots.extend(names.iter().map(|n| (n.as_str(), bucket)));
        }
        slots
    }
}
