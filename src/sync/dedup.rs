use crate::domain::ChangeRecord;
use std::collections::HashMap;

/// Collapse a batch by change id in a single forward pass.
///
/// Later duplicates overwrite earlier ones in place, so the surviving
/// record keeps the first-seen position while carrying the last-seen
/// field values. Records with an empty change id never enter the key map:
/// they pass through untouched, which can leave several blank-key rows in
/// the output. The table shows exactly that today, so keep it until the
/// source feed stops emitting blank ids.
pub fn resolve(records: Vec<ChangeRecord>) -> Vec<ChangeRecord> {
    let mut out: Vec<ChangeRecord> = Vec::with_capacity(records.len());
    let mut slots: HashMap<String, usize> = HashMap::new();

    for record in records {
        if record.u_change_id.is_empty() {
            out.push(record);
            continue;
        }

        match slots.get(&record.u_change_id) {
            Some(&slot) => out[slot] = record,
            None => {
                slots.insert(record.u_change_id.clone(), out.len());
                out.push(record);
            }
        }
    }

    out
}
