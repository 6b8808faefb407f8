use super::*;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryKey {
    pub base_name: String,
    pub kind: ModificationKind,
    pub parameter: Option<Parameter>,
}

impl From<GroundTruth> for QueryKey {
    fn from(truth: GroundTruth) -> Self {
        Self {
            base_name: truth.base_name,
            kind: truth.kind,
            parameter: truth.parameter,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TruePositive,
    FalsePositive,
    FalseNegative,
}

#[derive(Debug, Clone)]
pub struct Query {
    key: QueryKey,
    matches: Vec<MatchRecord>,
}

impl Query {
    pub fn new(key: QueryKey) -> Self {
        Self {
            key,
            matches: Vec::new(),
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    pub fn add_match(&mut self, record: MatchRecord) {
        self.matches.push(record);
    }

    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn first_match_correct(&self) -> bool {
        self.matches
            .first()
            .is_some_and(|first| file_stem(&first.ref_path) == self.key.base_name)
    }

    pub fn outcome(&self) -> Outcome {
        if self.first_match_correct() {
            Outcome::TruePositive
        } else if self.has_matches() {
            Outcome::FalsePositive
        } else {
            Outcome::FalseNegative
        }
    }
}

pub struct QueryAggregator<'a> {
    extractor: &'a GroundTruthExtractor,
    queries: BTreeMap<QueryKey, Query>,
    fallback_records: usize,
}

impl<'a> QueryAggregator<'a> {
    pub fn new(extractor: &'a GroundTruthExtractor) -> Self {
        Self {
            extractor,
            queries: BTreeMap::new(),
            fallback_records: 0,
        }
    }

    pub fn ingest(&mut self, record: MatchRecord) -> &Query {
        let key = QueryKey::from(self.extractor.extract(&record.query_path));
        if key.base_name.is_empty() {
            self.fallback_records += 1;
        }
        let query = self
            .queries
            .entry(key)
            .or_insert_with_key(|key| Query::new(key.clone()));

        if !record.is_no_match() {
            query.add_match(record);
        }

        query
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn fallback_records(&self) -> usize {
        self.fallback_records
    }

    pub fn queries(&self) -> impl Iterator<Item = &Query> {
        self.queries.values()
    }
}
