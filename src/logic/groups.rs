//! Group stage: group formation, per-group round robins, qualification and knockout handoff.

use crate::logic::bracket::{build_bracket, seeded_bracket};
use crate::logic::round_robin::schedule_round_robin;
use crate::models::{
    Group, GroupId, GroupScoreReport, GroupStage, Knockout, MatchId, PlayerId, Qualifiers,
    StandingsLedger, TournamentError,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Largest group count allowed for a roster: every group needs at least two players.
pub fn max_groups(player_count: usize) -> usize {
    player_count / 2
}

/// Group sizes for a roster split into `num_groups`, as `(group count, size)` pairs,
/// larger groups first. `[(2, 5), (1, 4)]` reads "two groups of 5 and one of 4".
pub fn group_distribution(player_count: usize, num_groups: usize) -> Vec<(usize, usize)> {
    if num_groups == 0 {
        return Vec::new();
    }
    let base = player_count / num_groups;
    let remainder = player_count % num_groups;
    if remainder == 0 {
        vec![(num_groups, base)]
    } else {
        vec![(remainder, base + 1), (num_groups - remainder, base)]
    }
}

/// Shuffle the roster, deal it into `num_groups` groups and schedule each group.
pub fn form_groups<R: Rng + ?Sized>(
    players: &[PlayerId],
    num_groups: usize,
    rng: &mut R,
) -> Result<GroupStage, TournamentError> {
    let max = max_groups(players.len());
    if num_groups < 2 || num_groups > max {
        return Err(TournamentError::GroupCountOutOfRange {
            requested: num_groups,
            max,
        });
    }

    let mut shuffled = players.to_vec();
    shuffled.shuffle(rng);
    let mut groups: Vec<Group> = (0..num_groups).map(Group::new).collect();
    for (i, player) in shuffled.into_iter().enumerate() {
        groups[i % num_groups].players.push(player);
    }

    let mut matches = Vec::new();
    let mut standings = HashMap::with_capacity(num_groups);
    for group in &groups {
        matches.extend(schedule_round_robin(&group.players, Some(group.id)));
        standings.insert(group.id, StandingsLedger::new(&group.players));
    }
    log::debug!(
        "Formed {} groups from {} players, {} group matches",
        num_groups,
        players.len(),
        matches.len()
    );

    Ok(GroupStage {
        groups,
        matches,
        standings,
    })
}

impl GroupStage {
    /// Record or correct a group match score. Groups never affect each other.
    pub fn record_score(
        &mut self,
        match_id: MatchId,
        player_1_score: u32,
        player_2_score: u32,
    ) -> Result<GroupScoreReport, TournamentError> {
        let m = self
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        let group_id: GroupId = m.group_id.ok_or(TournamentError::MatchNotFound(match_id))?;
        let ledger = self
            .standings
            .get_mut(&group_id)
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        let edited = m.is_decided();
        let winner = ledger.record_score(m, player_1_score, player_2_score)?;
        Ok(GroupScoreReport {
            group_id,
            winner,
            edited,
            stage_complete: self.is_complete(),
        })
    }

    /// Group winners (in group order), shuffled runners-up, and everyone else.
    pub fn qualifiers<R: Rng + ?Sized>(&self, all_players: &[PlayerId], rng: &mut R) -> Qualifiers {
        qualifiers(&self.groups, &self.standings, all_players, rng)
    }
}

fn qualifiers<R: Rng + ?Sized>(
    groups: &[Group],
    standings: &HashMap<GroupId, StandingsLedger>,
    all_players: &[PlayerId],
    rng: &mut R,
) -> Qualifiers {
    let mut winners = Vec::with_capacity(groups.len());
    let mut runners_up = Vec::with_capacity(groups.len());
    for group in groups {
        let ranked: Vec<PlayerId> = match standings.get(&group.id) {
            Some(ledger) => ledger.ranked().iter().map(|s| s.player_id).collect(),
            None => group.players.clone(),
        };
        if let Some(&first) = ranked.first() {
            winners.push(first);
        }
        if let Some(&second) = ranked.get(1) {
            runners_up.push(second);
        }
    }
    runners_up.shuffle(rng);

    let qualified: HashSet<PlayerId> = winners.iter().chain(runners_up.iter()).copied().collect();
    let others = all_players
        .iter()
        .copied()
        .filter(|p| !qualified.contains(p))
        .collect();
    Qualifiers {
        winners,
        runners_up,
        others,
    }
}

/// Build the main and consolation brackets from final group standings.
///
/// Group winners are seeded in group order, runners-up fill the remaining slots. Players
/// who did not qualify play an unseeded, shuffled consolation bracket. Either bracket is
/// left out when it would have fewer than two players. Both are progressed once so
/// walkovers are already resolved.
pub fn derive_knockout<R: Rng + ?Sized>(
    groups: &[Group],
    standings: &HashMap<GroupId, StandingsLedger>,
    all_players: &[PlayerId],
    rng: &mut R,
) -> Knockout {
    let q = qualifiers(groups, standings, all_players, rng);

    let mut main = (q.count() >= 2).then(|| seeded_bracket(&q.winners, &q.runners_up));
    let main_champion = main.as_mut().and_then(|b| b.propagate());

    let mut consolation = (q.others.len() >= 2).then(|| build_bracket(&q.others, true, rng));
    let consolation_champion = consolation.as_mut().and_then(|b| b.propagate());

    log::debug!(
        "Knockout: {} qualifiers, {} in consolation",
        q.count(),
        q.others.len()
    );
    Knockout {
        main,
        consolation,
        main_champion,
        consolation_champion,
    }
}
