//! `PostgreSQL` integration tests for filtered listings, search and
//! aggregates.

use super::helpers::{PgDeck, pg_deck};
use crate::test_helpers::days;
use eyre::{ensure, eyre};
use mockable::Clock;
use rstest::rstest;
use taskdeck::task::{
    domain::{Task, TaskDraft},
    services::ListTasksRequest,
};

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(Task::title).collect()
}

async fn seed_household(deck: &PgDeck) -> eyre::Result<()> {
    let now = deck.clock.utc();
    deck.lifecycle
        .create(
            &TaskDraft::new("Pay rent")
                .with_priority("high")
                .with_category("home")
                .with_tags(["bills", "home"]),
        )
        .await?;
    deck.lifecycle
        .create(
            &TaskDraft::new("Water plants")
                .with_priority("low")
                .with_category("garden")
                .with_progress(60),
        )
        .await?;
    deck.lifecycle
        .create(
            &TaskDraft::new("File taxes")
                .with_priority("urgent")
                .with_tags(["bills"])
                .with_due_date(now + days(2)),
        )
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_match_in_sql(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    seed_household(&deck).await?;
    let cutoff = deck.clock.utc() + days(2);

    let by_priority = deck
        .queries
        .list(&ListTasksRequest {
            priority: Some("high".to_owned()),
            ..ListTasksRequest::default()
        })
        .await?;
    let by_tag = deck
        .queries
        .list(&ListTasksRequest {
            tags: vec!["bills".to_owned(), "unused".to_owned()],
            ..ListTasksRequest::default()
        })
        .await?;
    let by_category = deck
        .queries
        .list(&ListTasksRequest {
            category: Some("garden".to_owned()),
            ..ListTasksRequest::default()
        })
        .await?;
    let by_progress = deck
        .queries
        .list(&ListTasksRequest {
            progress_min: Some(50),
            progress_max: Some(99),
            ..ListTasksRequest::default()
        })
        .await?;
    let by_due = deck
        .queries
        .list(&ListTasksRequest {
            due_before: Some(cutoff),
            ..ListTasksRequest::default()
        })
        .await?;

    ensure!(titles(&by_priority.tasks) == ["Pay rent"]);
    ensure!(by_tag.total_count == 2);
    ensure!(titles(&by_tag.tasks) == ["Pay rent", "File taxes"]);
    ensure!(titles(&by_category.tasks) == ["Water plants"]);
    ensure!(titles(&by_progress.tasks) == ["Water plants"]);
    ensure!(titles(&by_due.tasks) == ["File taxes"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completed_filter_tracks_the_flag(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    let done = deck.lifecycle.create(&TaskDraft::new("Done")).await?;
    deck.lifecycle.create(&TaskDraft::new("Open")).await?;
    deck.lifecycle.toggle_completed(done.id()).await?;

    let completed = deck
        .queries
        .list(&ListTasksRequest {
            completed: Some(true),
            ..ListTasksRequest::default()
        })
        .await?;
    let pending = deck
        .queries
        .list(&ListTasksRequest {
            status: Some("pending".to_owned()),
            ..ListTasksRequest::default()
        })
        .await?;

    ensure!(titles(&completed.tasks) == ["Done"]);
    ensure!(titles(&pending.tasks) == ["Open"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_page_holds_the_remainder(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    seed_household(&deck).await?;

    let page = deck
        .queries
        .list(&ListTasksRequest {
            page: Some(2),
            limit: Some(2),
            ..ListTasksRequest::default()
        })
        .await?;

    ensure!(page.tasks.len() == 1);
    ensure!(page.total_count == 3);
    ensure!(page.total_pages == 2);
    ensure!(titles(&page.tasks) == ["File taxes"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn page_past_the_largest_offset_is_empty(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    seed_household(&deck).await?;

    let page = deck
        .queries
        .list(&ListTasksRequest {
            page: Some(u64::MAX),
            limit: Some(u64::MAX),
            ..ListTasksRequest::default()
        })
        .await?;

    ensure!(page.tasks.is_empty());
    ensure!(page.total_count == 3);
    Ok(())
}

#[rstest]
#[case("desc", &["File taxes", "Pay rent", "Water plants"])]
#[case("asc", &["Water plants", "Pay rent", "File taxes"])]
#[tokio::test(flavor = "multi_thread")]
async fn priority_sorts_by_rank(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
    #[case] order: &str,
    #[case] expected: &[&str],
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    seed_household(&deck).await?;

    let page = deck
        .queries
        .list(&ListTasksRequest {
            sort_by: Some("priority".to_owned()),
            sort_order: Some(order.to_owned()),
            ..ListTasksRequest::default()
        })
        .await?;

    ensure!(titles(&page.tasks) == expected, "got {:?}", titles(&page.tasks));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ties_and_unknown_sort_fields_keep_insertion_order(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    for title in ["first", "second", "third"] {
        deck.lifecycle.create(&TaskDraft::new(title)).await?;
    }

    let unknown = deck
        .queries
        .list(&ListTasksRequest {
            sort_by: Some("nonsense".to_owned()),
            ..ListTasksRequest::default()
        })
        .await?;
    let same_priority = deck
        .queries
        .list(&ListTasksRequest {
            sort_by: Some("priority".to_owned()),
            ..ListTasksRequest::default()
        })
        .await?;

    ensure!(titles(&unknown.tasks) == ["first", "second", "third"]);
    ensure!(titles(&same_priority.tasks) == ["first", "second", "third"]);
    Ok(())
}

#[rstest]
#[case("100%", "all", &["Alpha 100%"])]
#[case("E_C", "all", &["Gamma"])]
#[case("door", "tags", &["Gamma"])]
#[case("door", "title", &[])]
#[case("ALPHA", "title", &["Alpha 100%", "Alpha 1000"])]
#[tokio::test(flavor = "multi_thread")]
async fn search_matches_literal_substrings_within_scope(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
    #[case] term: &str,
    #[case] scope: &str,
    #[case] expected: &[&str],
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    deck.lifecycle.create(&TaskDraft::new("Alpha 100%")).await?;
    deck.lifecycle
        .create(&TaskDraft::new("Alpha 1000").with_description("see the EXC notes"))
        .await?;
    deck.lifecycle
        .create(
            &TaskDraft::new("Gamma")
                .with_category("E_C")
                .with_tags(["outdoor"]),
        )
        .await?;

    let found = deck.queries.search(term, scope, None).await?;

    ensure!(titles(&found) == expected, "got {:?}", titles(&found));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_excludes_completed_tasks(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    let due = deck.clock.utc() + days(1);
    let late = deck
        .lifecycle
        .create(&TaskDraft::new("Renew passport").with_due_date(due))
        .await?;
    let handled = deck
        .lifecycle
        .create(&TaskDraft::new("Book dentist").with_due_date(due))
        .await?;
    deck.lifecycle.create(&TaskDraft::new("Someday")).await?;
    ensure!(deck.queries.find_overdue().await?.is_empty());

    deck.clock.advance(days(2));
    deck.lifecycle.mark_complete(handled.id()).await?;

    let overdue = deck.queries.find_overdue().await?;
    ensure!(overdue.len() == 1);
    let task = overdue.first().ok_or_else(|| eyre!("expected one task"))?;
    ensure!(task.id() == late.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn statistics_on_an_empty_table_are_zero(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };

    let statistics = deck.queries.statistics().await?;

    ensure!(statistics.total == 0);
    ensure!(statistics.completed == 0);
    ensure!(statistics.overdue == 0);
    ensure!(statistics.completion_rate == 0);
    ensure!(statistics.overdue_rate == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn statistics_aggregate_in_one_pass(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    let due = deck.clock.utc() + days(1);
    deck.lifecycle
        .create(&TaskDraft::new("Waiting").with_due_date(due))
        .await?;
    deck.lifecycle
        .create(
            &TaskDraft::new("Halfway")
                .with_progress(50)
                .with_due_date(due),
        )
        .await?;
    let finished = deck
        .lifecycle
        .create(&TaskDraft::new("Finished").with_due_date(due))
        .await?;
    deck.lifecycle.mark_complete(finished.id()).await?;
    deck.clock.advance(days(2));

    let statistics = deck.queries.statistics().await?;

    ensure!(statistics.total == 3);
    ensure!(statistics.completed == 1);
    ensure!(statistics.pending == 1);
    ensure!(statistics.in_progress == 1);
    ensure!(statistics.overdue == 2);
    ensure!(statistics.completion_rate == 33);
    ensure!(statistics.overdue_rate == 67);
    ensure!(statistics.active == 2);
    Ok(())
}
