use serde::Serialize;

/// One row of the correspondence table.
///
/// Ids are 1-based positions in the caller's input order, `None` marks a
/// peak without a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeakPair {
    pub q_id: Option<usize>,
    pub l_id: Option<usize>,
}

/// Pairing between query and library peaks.
///
/// Every peak of both spectra shows up exactly once. Serialized in columnar
/// form (`{"q_id": [...], "l_id": [...]}`) with `null` for missing ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Correspondence {
    pub(crate) pairs: Vec<PeakPair>,
}

impl Correspondence {
    pub fn pairs(&self) -> &[PeakPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn q_ids(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.pairs.iter().map(|p| p.q_id)
    }

    pub fn l_ids(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.pairs.iter().map(|p| p.l_id)
    }

    /// Only the rows where both sides are present.
    pub fn matched(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().filter_map(|p| match (p.q_id, p.l_id) {
            (Some(q), Some(l)) => Some((q, l)),
            _ => None,
        })
    }
}

impl Serialize for Correspondence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let q_id: Vec<Option<usize>> = self.q_ids().collect();
        let l_id: Vec<Option<usize>> = self.l_ids().collect();
        let mut state = serializer.serialize_struct("Correspondence", 2)?;
        state.serialize_field("q_id", &q_id)?;
        state.serialize_field("l_id", &l_id)?;
        state.end()
    }
}

/// Outcome of aligning one query against one library spectrum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentResult {
    #[serde(rename = "idx")]
    pub correspondence: Correspondence,
    /// Similarity in [0, 100].
    pub score: f64,
    /// Mean signed m/z deviation (`query - library`) over the matched pairs.
    /// `None` when nothing matched.
    pub deviation_mz: Option<f64>,
    pub npeak: usize,
}

impl AlignmentResult {
    pub fn is_degenerate(&self) -> bool {
        self.npeak == 0
    }
}
