//! Records, for every derived step, the prior step ids that justified it.
use std::{collections::BTreeMap, io::Write};

/// A side-band record mapping each derived step id to the antecedent ids it depends on.
#[derive(Debug, Default)]
pub struct AntecedentRecord {
    entries: BTreeMap<u64, Vec<u64>>,
}

impl AntecedentRecord {
    pub fn new() -> Self {
        AntecedentRecord::default()
    }

    /// Records that `step_id` was justified by `antecedents`. Every antecedent must be
    /// strictly smaller than `step_id`.
    pub fn record(&mut self, step_id: u64, antecedents: Vec<u64>) {
        debug_assert!(
            antecedents.iter().all(|id| *id < step_id),
            "antecedent {step_id} cites a later or equal step"
        );
        let _ = self.entries.insert(step_id, antecedents);
    }

    pub fn get(&self, step_id: u64) -> Option<&[u64]> {
        self.entries.get(&step_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &[u64])> {
        self.entries.iter().map(|(id, ants)| (*id, ants.as_slice()))
    }

    /// Writes the `<proofname>.rup` side-band: one `id:antecedent antecedent ...` line per
    /// derived step, ascending by id.
    pub fn write_sideband(&self, mut out: impl Write) -> std::io::Result<()> {
        for (id, antecedents) in &self.entries {
            let joined = antecedents
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "{id}:{joined}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_and_retrieves_antecedents() {
        let mut record = AntecedentRecord::new();
        record.record(3, vec![1, 2]);
        assert_eq!(record.get(3), Some(&[1, 2][..]));
        assert_eq!(record.get(4), None);
    }

    #[test]
    fn writes_sideband_format() {
        let mut record = AntecedentRecord::new();
        record.record(3, vec![1, 2]);
        record.record(5, vec![3]);
        let mut buffer = Vec::new();
        record.write_sideband(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "3:1 2\n5:3\n");
    }
}
