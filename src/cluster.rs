//! Neighborhood clustering.
//!
//! Candidates are grouped by exact neighborhood label. The first `k`
//! labels in order of appearance become clusters; candidates in later
//! neighborhoods are left out of the schedule.

use crate::model::{Candidate, Category};

/// Upper bound on clusters regardless of trip length
pub const MAX_CLUSTERS: usize = 3;

/// Candidates sharing a neighborhood label, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub neighborhood: String,
    pub members: Vec<Candidate>,
}

impl Cluster {
    pub fn of_category(&self, category: Category) -> impl Iterator<Item = &Candidate> {
        self.members.iter().filter(move |c| c.category == category)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// `k = min(duration_days, 3)`
pub fn cluster_count(duration_days: u32) -> usize {
    (duration_days as usize).min(MAX_CLUSTERS)
}

/// Deterministic; an empty input yields no clusters
pub fn cluster<'a, I>(candidates: I, k: usize) -> Vec<Cluster>
where
    I: IntoIterator<Item = &'a Candidate>,
{
    let mut clusters: Vec<Cluster> = Vec::new();
    for candidate in candidates {
        let label = &candidate.location.neighborhood;
        if let Some(cluster) = clusters.iter_mut().find(|c| &c.neighborhood == label) {
            cluster.members.push(candidate.clone());
        } else if clusters.len() < k {
            clusters.push(Cluster {
                neighborhood: label.clone(),
                members: vec![candidate.clone()],
            });
        }
    }
    clusters
}
