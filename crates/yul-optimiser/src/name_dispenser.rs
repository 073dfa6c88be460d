use rustc_hash::FxHashSet;
use yul_ir::{Block, NameCollector};

/// Hands out identifiers that are not yet in use anywhere in the module.
///
/// Every dispensed name is recorded immediately, so two calls never return
/// the same name. The scheme is "first unused of `prefix`, `prefix_1`,
/// `prefix_2`, ..." which keeps output reproducible for a given seed.
#[derive(Debug, Clone, Default)]
pub struct NameDispenser {
    used_names: FxHashSet<String>,
}

impl NameDispenser {
    pub fn new<I, S>(used_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            used_names: used_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Seed the dispenser with every name occurring in `module`.
    pub fn from_module(module: &Block) -> Self {
        Self::new(NameCollector::collect(module))
    }

    pub fn new_name(&mut self, prefix: &str) -> String {
        let mut name = prefix.to_string();
        let mut suffix = 0usize;
        while name.is_empty() || self.used_names.contains(&name) {
            suffix += 1;
            name = format!("{prefix}_{suffix}");
        }
        self.used_names.insert(name.clone());
        name
    }

    /// Mark `name` as taken without dispensing it.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.used_names.insert(name.into());
    }

    pub fn is_used(&self, name: &str) -> bool {
        self.used_names.contains(name)
    }
}
