//! Keyed join of node and name records into unified taxa

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use taxadb_core::{TaxadbResult, Taxon};
use tracing::{debug, info};

use crate::reader::{NameRecord, NodeRecord};

/// Join node records with scientific-name records by taxon id.
///
/// Output order follows the node input. A node without a matching name
/// keeps an empty `scientific_name`; a name without a node is dropped.
/// A repeated taxon id replaces the earlier node record in place, so
/// the result never holds two taxa with the same id.
pub fn merge_taxa<N, M>(nodes: N, names: M) -> TaxadbResult<Vec<Taxon>>
where
    N: IntoIterator<Item = TaxadbResult<NodeRecord>>,
    M: IntoIterator<Item = TaxadbResult<NameRecord>>,
{
    let mut taxa: Vec<Taxon> = Vec::new();
    let mut by_id: HashMap<u32, usize> = HashMap::new();

    for node in nodes {
        let NodeRecord {
            taxon_id,
            parent_taxon_id,
            rank,
        } = node?;
        let taxon = Taxon {
            taxon_id,
            parent_taxon_id,
            scientific_name: String::new(),
            rank,
        };
        match by_id.entry(taxon_id) {
            Entry::Occupied(slot) => taxa[*slot.get()] = taxon,
            Entry::Vacant(slot) => {
                slot.insert(taxa.len());
                taxa.push(taxon);
            }
        }
    }

    let mut matched = 0usize;
    let mut unmatched = 0usize;
    for name in names {
        let name = name?;
        match by_id.get(&name.taxon_id) {
            Some(&index) => {
                taxa[index].scientific_name = name.scientific_name;
                matched += 1;
            }
            None => unmatched += 1,
        }
    }

    if unmatched > 0 {
        debug!("{} name records had no matching node", unmatched);
    }
    info!("merged {} taxa ({} names matched)", taxa.len(), matched);
    Ok(taxa)
}
