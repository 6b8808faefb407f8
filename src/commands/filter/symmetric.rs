use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedMatch {
    pub record: MatchRecord,
    pub symmetric: bool,
}

/// Flags mutual matches: two records sharing the unordered {query, reference}
/// pair. Pairs seen once, or more than twice, stay untagged. Records without
/// a reference are never tagged.
pub fn tag_symmetric(records: Vec<MatchRecord>) -> Vec<TaggedMatch> {
    let mut groups: HashMap<(String, String), Vec<usize>> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        if record.is_no_match() {
            continue;
        }
        let (first, second) = record.ordered_pair();
        groups
            .entry((first.to_string(), second.to_string()))
            .or_default()
            .push(index);
    }

    let mut symmetric = vec![false; records.len()];
    for members in groups.values().filter(|members| members.len() == 2) {
        for &index in members {
            symmetric[index] = true;
        }
    }

    records
        .into_iter()
        .zip(symmetric)
        .map(|(record, symmetric)| TaggedMatch { record, symmetric })
        .collect()
}
