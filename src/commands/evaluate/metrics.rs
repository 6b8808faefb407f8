use super::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub true_positive: u64,
    pub false_positive: u64,
    pub false_negative: u64,
}

impl OutcomeCounts {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::TruePositive => self.true_positive += 1,
            Outcome::FalsePositive => self.false_positive += 1,
            Outcome::FalseNegative => self.false_negative += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.true_positive + self.false_positive + self.false_negative
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub kind: ModificationKind,
    pub parameter: Option<Parameter>,
}

impl BucketKey {
    pub fn new(kind: ModificationKind, parameter: Option<Parameter>) -> Self {
        Self { kind, parameter }
    }

    fn reference() -> Self {
        Self::new(ModificationKind::Reference, None)
    }
}

#[derive(Debug, Default)]
pub struct ModificationMetrics {
    buckets: BTreeMap<BucketKey, OutcomeCounts>,
}

impl ModificationMetrics {
    pub fn from_queries<'q>(queries: impl IntoIterator<Item = &'q Query>) -> Self {
        let mut metrics = Self::default();
        for query in queries {
            metrics.record(query);
        }
        metrics
    }

    pub fn record(&mut self, query: &Query) {
        let key = BucketKey::new(query.key().kind.clone(), query.key().parameter);
        self.buckets.entry(key).or_default().record(query.outcome());
    }

    pub fn inject_baseline_anchors(&mut self) -> Result<()> {
        let Some(reference) = self.buckets.get(&BucketKey::reference()).copied() else {
            bail!(
                "no Reference queries found; cannot anchor {} curves at their no-change value",
                ModificationKind::PARAMETRIC
                    .iter()
                    .map(ModificationKind::display_name)
                    .collect::<Vec<_>>()
                    .join("/")
            );
        };

        for kind in ModificationKind::PARAMETRIC {
            let parameter = kind.no_change_parameter();
            self.buckets.insert(BucketKey::new(kind, parameter), reference);
        }

        Ok(())
    }

    pub fn get(&self, kind: &ModificationKind, parameter: Option<Parameter>) -> Option<OutcomeCounts> {
        self.buckets
            .get(&BucketKey::new(kind.clone(), parameter))
            .copied()
    }

    pub fn buckets(&self) -> impl Iterator<Item = (&BucketKey, &OutcomeCounts)> {
        self.buckets.iter()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }
}
