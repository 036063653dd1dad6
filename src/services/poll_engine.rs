use tracing::{debug, info};

use crate::db::store::PollStore;
use crate::models::poll_models::{OptionTally, Poll, PollTally};
use crate::utils::error::{AppError, AppResult};
use crate::utils::{parse_object_id, required_text};

pub async fn create_poll(
    store: &dyn PollStore,
    question: &str,
    options: &[String],
    created_by: &str,
) -> AppResult<Poll> {
    let question = required_text(question, "question")?;

    if options.len() < 2 {
        return Err(AppError::ValidationError(
            "Enter atleast 2 options for the user to select from".to_string(),
        ));
    }

    let options = options
        .iter()
        .map(|option| required_text(option, "option text"))
        .collect::<AppResult<Vec<String>>>()?;

    let created_by = required_text(created_by, "createdBy")?;

    let poll = Poll::new(question, options, created_by);
    store.insert_poll(&poll).await?;

    info!(poll_id = %poll.id, options = poll.options.len(), "poll created");
    Ok(poll)
}

pub async fn list_polls(store: &dyn PollStore) -> AppResult<Vec<Poll>> {
    let polls = store.list_polls().await?;
    debug!(count = polls.len(), "listed polls");
    Ok(polls)
}

pub async fn get_poll(store: &dyn PollStore, poll_id: &str) -> AppResult<Poll> {
    let id = parse_object_id(poll_id, "poll")?;
    store
        .find_poll(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Poll not found".to_string()))
}

/// Records `user_id`'s vote for `option_index`, moving any earlier vote.
///
/// Re-voting the same option is a no-op; there is no un-vote.
pub async fn vote(
    store: &dyn PollStore,
    poll_id: &str,
    option_index: usize,
    user_id: Option<&str>,
) -> AppResult<Poll> {
    let user_id = user_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::ValidationError("userId is required to vote".to_string()))?;

    let poll = get_poll(store, poll_id).await?;

    if option_index >= poll.options.len() {
        return Err(AppError::ValidationError(format!(
            "Option index {} is out of range for this poll",
            option_index
        )));
    }

    // Options are fixed after creation, so a miss here means the poll vanished.
    let updated = store
        .record_vote(poll.id, option_index, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Poll not found".to_string()))?;

    info!(poll_id = %updated.id, option_index, "vote recorded");
    Ok(updated)
}

pub fn tally_of(poll: &Poll) -> PollTally {
    let total_votes = poll.total_votes();

    let options = poll
        .options
        .iter()
        .map(|option| {
            let votes = option.votes.len();
            let percent = if total_votes == 0 {
                0.0
            } else {
                (votes as f64 / total_votes as f64 * 1000.0).round() / 10.0
            };
            OptionTally {
                text: option.text.clone(),
                votes,
                percent,
            }
        })
        .collect();

    PollTally {
        poll_id: poll.id.to_hex(),
        question: poll.question.clone(),
        total_votes,
        options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_store::MemoryStore;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn lunch_options() -> Vec<String> {
        vec!["Pizza".to_string(), "Salad".to_string()]
    }

    fn voters_of(poll: &Poll, user: &str) -> usize {
        poll.options
            .iter()
            .filter(|option| option.votes.iter().any(|voter| voter == user))
            .count()
    }

    #[tokio::test]
    async fn lunch_scenario_moves_the_vote() {
        let store = MemoryStore::new();
        let poll = create_poll(&store, "Lunch?", &lunch_options(), "admin").await.unwrap();
        let id = poll.id.to_hex();

        let poll = vote(&store, &id, 0, Some("u1")).await.unwrap();
        let tally = tally_of(&poll);
        assert_eq!(tally.total_votes, 1);
        assert_eq!((tally.options[0].votes, tally.options[0].percent), (1, 100.0));
        assert_eq!((tally.options[1].votes, tally.options[1].percent), (0, 0.0));

        let poll = vote(&store, &id, 1, Some("u1")).await.unwrap();
        let tally = tally_of(&poll);
        assert_eq!(tally.options[0].votes, 0);
        assert_eq!((tally.options[1].votes, tally.options[1].percent), (1, 100.0));
        assert_eq!(voters_of(&poll, "u1"), 1);
    }

    #[tokio::test]
    async fn voting_twice_for_the_same_option_is_a_no_op() {
        let store = MemoryStore::new();
        let poll = create_poll(&store, "Lunch?", &lunch_options(), "admin").await.unwrap();
        let id = poll.id.to_hex();

        let first = vote(&store, &id, 0, Some("u1")).await.unwrap();
        let second = vote(&store, &id, 0, Some("u1")).await.unwrap();
        assert_eq!(first.options, second.options);
        assert_eq!(second.options[0].votes, vec!["u1".to_string()]);
    }

    #[tokio::test]
    async fn create_rejects_bad_input() {
        let store = MemoryStore::new();
        let err = create_poll(&store, "  ", &lunch_options(), "admin").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = create_poll(&store, "Lunch?", &["Pizza".to_string()], "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = create_poll(&store, "Lunch?", &["Pizza".to_string(), " ".to_string()], "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        assert!(list_polls(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn vote_rejects_missing_user_bad_index_and_unknown_poll() {
        let store = MemoryStore::new();
        let poll = create_poll(&store, "Lunch?", &lunch_options(), "admin").await.unwrap();
        let id = poll.id.to_hex();

        assert!(matches!(
            vote(&store, &id, 0, None).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            vote(&store, &id, 0, Some("   ")).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            vote(&store, &id, 2, Some("u1")).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            vote(&store, "not-an-id", 0, Some("u1")).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            vote(&store, &mongodb::bson::oid::ObjectId::new().to_hex(), 0, Some("u1")).await,
            Err(AppError::NotFound(_))
        ));

        let untouched = get_poll(&store, &id).await.unwrap();
        assert_eq!(untouched.total_votes(), 0);
    }

    #[tokio::test]
    async fn polls_list_in_insertion_order() {
        let store = MemoryStore::new();
        for question in ["First?", "Second?", "Third?"] {
            create_poll(&store, question, &lunch_options(), "admin").await.unwrap();
        }
        let questions: Vec<String> = list_polls(&store)
            .await
            .unwrap()
            .into_iter()
            .map(|poll| poll.question)
            .collect();
        assert_eq!(questions, vec!["First?", "Second?", "Third?"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_votes_are_all_recorded_once() {
        let store = Arc::new(MemoryStore::new());
        let poll = create_poll(store.as_ref(), "Offsite?", &lunch_options(), "admin")
            .await
            .unwrap();
        let id = poll.id.to_hex();

        let mut handles = Vec::new();
        for n in 0..40 {
            let store = store.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                let user = format!("user-{}", n);
                vote(store.as_ref(), &id, n % 2, Some(user.as_str())).await
            }));
        }
        // Same user hammering both options at once.
        for n in 0..20 {
            let store = store.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                vote(store.as_ref(), &id, n % 2, Some("flip-flop")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let poll = get_poll(store.as_ref(), &id).await.unwrap();
        assert_eq!(poll.total_votes(), 41);
        assert_eq!(voters_of(&poll, "flip-flop"), 1);
        for n in 0..40 {
            assert_eq!(voters_of(&poll, &format!("user-{}", n)), 1);
        }
    }

    #[test]
    fn empty_poll_tallies_to_zero() {
        let poll = Poll::new("Lunch?".into(), lunch_options(), "admin".into());
        let tally = tally_of(&poll);
        assert_eq!(tally.total_votes, 0);
        assert!(tally.options.iter().all(|option| option.percent == 0.0));
    }

    #[test]
    fn percentages_round_to_one_decimal() {
        let mut poll = Poll::new(
            "Team?".into(),
            vec!["A".into(), "B".into(), "C".into()],
            "admin".into(),
        );
        poll.move_vote(0, "u1");
        poll.move_vote(1, "u2");
        poll.move_vote(2, "u3");
        let tally = tally_of(&poll);
        assert!(tally.options.iter().all(|option| option.percent == 33.3));
    }

    proptest! {
        #[test]
        fn each_user_holds_at_most_one_vote(
            ops in prop::collection::vec((0usize..4, 0usize..5), 0..60)
        ) {
            let mut poll = Poll::new(
                "Pick one".into(),
                vec!["A".into(), "B".into(), "C".into(), "D".into()],
                "admin".into(),
            );
            for (user, option) in &ops {
                poll.move_vote(*option, &format!("u{}", user));
            }

            for user in 0..4 {
                let voter = format!("u{}", user);
                let held = voters_of(&poll, &voter);
                prop_assert!(held <= 1, "{} holds {} votes", voter, held);
            }

            let tally = tally_of(&poll);
            let counted: usize = tally.options.iter().map(|option| option.votes).sum();
            prop_assert_eq!(counted, tally.total_votes);

            let percent_sum: f64 = tally.options.iter().map(|option| option.percent).sum();
            if tally.total_votes > 0 {
                prop_assert!((percent_sum - 100.0).abs() <= 0.2);
            } else {
                prop_assert_eq!(percent_sum, 0.0);
            }
        }

        #[test]
        fn out_of_range_vote_changes_nothing(option in 4usize..100) {
            let mut poll = Poll::new(
                "Pick one".into(),
                vec!["A".into(), "B".into(), "C".into(), "D".into()],
                "admin".into(),
            );
            poll.move_vote(1, "u1");
            let before = poll.clone();
            prop_assert!(!poll.move_vote(option, "u1"));
            prop_assert_eq!(poll, before);
        }
    }
}
