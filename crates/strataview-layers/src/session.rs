//! Ensemble/session collaborator.

use std::collections::HashMap;

use crate::setting::EnsembleIdent;

/// Source of the ensembles and the filtered realizations of each ensemble.
pub trait EnsembleSession {
    fn ensembles(&self) -> Vec<EnsembleIdent>;

    /// Realization numbers left after the session's realization filter.
    fn realizations(&self, ensemble: &EnsembleIdent) -> Vec<i64>;
}

/// Session with a fixed ensemble set.
#[derive(Debug, Clone, Default)]
pub struct StaticEnsembleSession {
    ensembles: Vec<(EnsembleIdent, Vec<i64>)>,
    filters: HashMap<EnsembleIdent, Vec<i64>>,
}

impl StaticEnsembleSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ensemble(mut self, ensemble: EnsembleIdent, realizations: Vec<i64>) -> Self {
        self.ensembles.push((ensemble, realizations));
        self
    }

    /// Restrict the visible realizations of `ensemble`.
    pub fn set_realization_filter(&mut self, ensemble: EnsembleIdent, keep: Vec<i64>) {
        self.filters.insert(ensemble, keep);
    }
}

impl EnsembleSession for StaticEnsembleSession {
    fn ensembles(&self) -> Vec<EnsembleIdent> {
        self.ensembles.iter().map(|(ident, _)| ident.clone()).collect()
    }

    fn realizations(&self, ensemble: &EnsembleIdent) -> Vec<i64> {
        let Some((_, all)) = self.ensembles.iter().find(|(ident, _)| ident == ensemble) else {
            return Vec::new();
        };
        match self.filters.get(ensemble) {
            Some(keep) => all.iter().copied().filter(|r| keep.contains(r)).collect(),
            None => all.clone(),
        }
    }
}
