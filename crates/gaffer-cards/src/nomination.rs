//! Discretionary cards: league peers nominating each other, plus the
//! one-shot reversal of a nomination.

use tracing::info;

use gaffer_core::{Card, CardKind, UserRef};
use gaffer_store::Store;

use crate::error::{CardError, CardResult};

/// Nominees per submission.
pub const MAX_NOMINATIONS: usize = 3;

/// Build the cards for one nomination submission. The submission slot is
/// the hash index, so resubmitting the same slate is a no-op. Slates above
/// [`MAX_NOMINATIONS`] are rejected outright.
pub fn build_slate(
    nominator_id: &str,
    nominator_team_id: i64,
    league_id: i64,
    gameweek: i32,
    nominees: &[UserRef],
) -> CardResult<Vec<Card>> {
    if nominees.len() > MAX_NOMINATIONS {
        return Err(CardError::TooManyNominees {
            got: nominees.len(),
            max: MAX_NOMINATIONS,
        });
    }

    Ok(nominees
        .iter()
        .enumerate()
        .map(|(slot, nominee)| {
            Card::nomination(
                &nominee.user_id,
                nominee.team_id,
                nominator_id,
                nominator_team_id,
                league_id,
                gameweek,
                slot as i32,
            )
        })
        .collect())
}

pub struct NominationService {
    store: Store,
}

impl NominationService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Nominate up to [`MAX_NOMINATIONS`] peers of the submitter's default
    /// league for the latest aggregated gameweek.
    pub async fn nominate(
        &self,
        nominator_id: &str,
        nominee_ids: &[String],
    ) -> CardResult<Vec<Card>> {
        if nominee_ids.len() > MAX_NOMINATIONS {
            return Err(CardError::TooManyNominees {
                got: nominee_ids.len(),
                max: MAX_NOMINATIONS,
            });
        }

        let gameweek = self
            .store
            .max_aggregated_gameweek()
            .await?
            .ok_or(CardError::NothingAggregated)?;

        let default = self
            .store
            .default_membership(nominator_id)
            .await?
            .ok_or_else(|| CardError::NoDefaultLeague {
                user_id: nominator_id.to_string(),
            })?;

        let mut nominees = Vec::with_capacity(nominee_ids.len());
        for nominee_id in nominee_ids {
            let nominee =
                self.store
                    .fetch_user(nominee_id)
                    .await?
                    .ok_or_else(|| CardError::UnknownUser {
                        user_id: nominee_id.clone(),
                    })?;
            nominees.push(nominee);
        }

        let cards = build_slate(
            nominator_id,
            default.team_id,
            default.league_id,
            gameweek,
            &nominees,
        )?;

        let inserted = self.store.insert_cards(&cards).await?;
        info!(
            nominator = %nominator_id,
            nominees = cards.len(),
            inserted,
            gameweek,
            "Submitted nominations"
        );
        Ok(cards)
    }

    /// Reverse a nomination back onto its nominator, consuming the
    /// submitter's one-shot reversal. The card keeps its hash; a reversed
    /// card can never be reversed again.
    pub async fn reverse(&self, user_id: &str, card_hash: &str) -> CardResult<Card> {
        let card =
            self.store
                .fetch_card(card_hash)
                .await?
                .ok_or_else(|| CardError::CardNotFound {
                    card_hash: card_hash.to_string(),
                })?;

        if card.kind != CardKind::Nomination || card.user_id != user_id {
            return Err(CardError::NotReversible {
                card_hash: card_hash.to_string(),
            });
        }

        if !self.store.consume_reverse(user_id).await? {
            return Err(CardError::ReverseUnavailable {
                user_id: user_id.to_string(),
            });
        }

        let reversed = card.reversed();
        self.store.update_card(&reversed).await?;
        info!(card_hash = %card_hash, user_id = %user_id, "Reversed nomination");
        Ok(reversed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominee(user_id: &str, team_id: i64) -> UserRef {
        UserRef {
            user_id: user_id.to_string(),
            team_id,
            has_reverse: false,
        }
    }

    #[test]
    fn test_slate_rejects_more_than_three_nominees() {
        let nominees: Vec<UserRef> = (0..4)
            .map(|i| nominee(&format!("peer{i}"), 100 + i))
            .collect();

        let err = build_slate("alice", 42, 7, 5, &nominees).unwrap_err();
        assert!(matches!(
            err,
            CardError::TooManyNominees { got: 4, max: MAX_NOMINATIONS }
        ));
    }

    #[test]
    fn test_slate_slots_become_hash_indexes() {
        let nominees = [nominee("bob", 10), nominee("carol", 11)];

        let cards = build_slate("alice", 42, 7, 5, &nominees).unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].card_hash, "bob_7_5_nomination_0");
        assert_eq!(cards[1].card_hash, "carol_7_5_nomination_1");
        assert!(cards.iter().all(|c| c.kind == CardKind::Nomination));
        assert!(cards.iter().all(|c| c.nominator_user_id == "alice"));
        assert!(cards.iter().all(|c| c.nominator_team_id == Some(42)));
    }

    #[test]
    fn test_empty_slate_is_allowed_and_empty() {
        assert!(build_slate("alice", 42, 7, 5, &[]).unwrap().is_empty());
    }
}
