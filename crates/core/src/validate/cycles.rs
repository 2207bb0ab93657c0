#![forbid(unsafe_code)]

use crate::model::WorkRecord;
use std::collections::HashMap;

/// A record whose parent chain leads back to itself.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct ParentCycle<'a> {
    pub record_id: &'a str,
    /// The loop starting and ending at `record_id`, following parent links.
    pub chain: Vec<&'a str>,
}

#[derive(Clone, Copy)]
enum Visit {
    OnTrail,
    Done,
}

/// Finds every record that sits on a parent cycle, once per id, in input order.
///
/// Every id has at most one parent; the last occurrence of a duplicated id
/// decides. A walk stops at a missing parent, at an explored id, or when it
/// revisits its own trail. Linear in the record count.
pub(super) fn find_parent_cycles(records: &[WorkRecord]) -> Vec<ParentCycle<'_>> {
    let mut parent_of: HashMap<&str, &str> = HashMap::with_capacity(records.len());
    for record in records {
        match record.parent() {
            Some(parent) => parent_of.insert(record.id.as_str(), parent),
            None => parent_of.remove(record.id.as_str()),
        };
    }

    let mut visits: HashMap<&str, Visit> = HashMap::with_capacity(records.len());
    let mut loops: HashMap<&str, Vec<&str>> = HashMap::new();

    for record in records {
        let mut trail: Vec<&str> = Vec::new();
        let mut current = Some(record.id.as_str());
        while let Some(id) = current {
            match visits.get(id).copied() {
                Some(Visit::Done) => break,
                Some(Visit::OnTrail) => {
                    if let Some(start) = trail.iter().position(|seen| *seen == id) {
                        record_loop(&trail[start..], &mut loops);
                    }
                    break;
                }
                None => {
                    visits.insert(id, Visit::OnTrail);
                    trail.push(id);
                    current = parent_of.get(id).copied();
                }
            }
        }
        for id in trail {
            visits.insert(id, Visit::Done);
        }
    }

    let mut cycles = Vec::with_capacity(loops.len());
    for record in records {
        if let Some(chain) = loops.remove(record.id.as_str()) {
            cycles.push(ParentCycle {
                record_id: record.id.as_str(),
                chain,
            });
        }
    }
    cycles
}

fn record_loop<'a>(members: &[&'a str], loops: &mut HashMap<&'a str, Vec<&'a str>>) {
    for (offset, member) in members.iter().enumerate() {
        let mut chain = Vec::with_capacity(members.len() + 1);
        chain.extend_from_slice(&members[offset..]);
        chain.extend_from_slice(&members[..offset]);
        chain.push(*member);
        loops.insert(*member, chain);
    }
}
