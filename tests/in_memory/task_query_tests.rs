//! In-memory integration tests for listing, calendar and aggregate queries.

use super::helpers::{TaskDeck, deck};
use crate::test_helpers::days;
use eyre::{ensure, eyre};
use mockable::Clock;
use rstest::rstest;
use taskdeck::task::{
    domain::{TaskDraft, TaskPriority},
    services::{CalendarFilter, ListTasksRequest, TaskErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overdue_follows_the_clock(deck: TaskDeck) -> eyre::Result<()> {
    let due = deck.clock.utc() + days(1);
    let late = deck
        .lifecycle
        .create(&TaskDraft::new("Renew passport").with_due_date(due))
        .await?;
    let handled = deck
        .lifecycle
        .create(&TaskDraft::new("Book dentist").with_due_date(due))
        .await?;
    ensure!(deck.queries.find_overdue().await?.is_empty());

    deck.clock.advance(days(2));
    deck.lifecycle.mark_complete(handled.id()).await?;

    let overdue = deck.queries.find_overdue().await?;
    ensure!(overdue.len() == 1);
    let task = overdue.first().ok_or_else(|| eyre!("expected one task"))?;
    ensure!(task.id() == late.id());

    let statistics = deck.queries.statistics().await?;
    ensure!(statistics.total == 2);
    ensure!(statistics.overdue == 1);
    ensure!(statistics.completion_rate == 50);
    ensure!(statistics.overdue_rate == 50);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn week_view_spans_sunday_to_saturday(deck: TaskDeck) -> eyre::Result<()> {
    let now = deck.clock.utc();
    deck.lifecycle
        .create(&TaskDraft::new("Friday review").with_due_date(now + days(2)))
        .await?;
    deck.lifecycle
        .create(&TaskDraft::new("Next Tuesday").with_due_date(now + days(6)))
        .await?;

    let week = deck.queries.find_this_week(&CalendarFilter::default()).await?;

    ensure!(week.week_start.to_string() == "2026-03-08");
    ensure!(week.week_end.to_string() == "2026-03-14");
    ensure!(week.tasks.len() == 1);
    let task = week.tasks.first().ok_or_else(|| eyre!("expected one task"))?;
    ensure!(task.title() == "Friday review");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn due_soon_window_is_configurable_per_call(deck: TaskDeck) -> eyre::Result<()> {
    let now = deck.clock.utc();
    for offset in [1, 3, 5] {
        deck.lifecycle
            .create(&TaskDraft::new(format!("In {offset} days")).with_due_date(now + days(offset)))
            .await?;
    }

    let default_window = deck.queries.find_due_soon(None).await?;
    let wider = deck.queries.find_due_soon(Some(7)).await?;

    ensure!(default_window.days == 3);
    ensure!(default_window.tasks.len() == 2);
    ensure!(wider.tasks.len() == 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_combines_filters_with_paging(deck: TaskDeck) -> eyre::Result<()> {
    let priorities = ["low", "high", "low", "high", "low", "high", "low"];
    for (n, priority) in priorities.into_iter().enumerate() {
        deck.lifecycle
            .create(
                &TaskDraft::new(format!("Errand {n}"))
                    .with_priority(priority)
                    .with_tags(["errands"]),
            )
            .await?;
    }

    let request = ListTasksRequest {
        priority: Some("low".to_owned()),
        tags: vec!["errands".to_owned()],
        limit: Some(3),
        page: Some(2),
        ..ListTasksRequest::default()
    };
    let page = deck.queries.list(&request).await?;

    ensure!(page.total_count == 4);
    ensure!(page.total_pages == 2);
    ensure!(page.tasks.len() == 1);
    ensure!(
        page.tasks
            .iter()
            .all(|task| task.priority() == TaskPriority::Low)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_scopes_narrow_matches(deck: TaskDeck) -> eyre::Result<()> {
    deck.lifecycle
        .create(&TaskDraft::new("Garden shed").with_tags(["outdoor"]))
        .await?;
    deck.lifecycle
        .create(&TaskDraft::new("Tidy desk").with_description("then the garden"))
        .await?;

    let everywhere = deck.queries.search("GARDEN", "all", None).await?;
    let titles = deck.queries.search("garden", "title", None).await?;
    let tags = deck.queries.search("door", "tags", None).await?;

    ensure!(everywhere.len() == 2);
    ensure!(titles.len() == 1);
    ensure!(tags.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_list_parameters_are_rejected(deck: TaskDeck) -> eyre::Result<()> {
    let request = ListTasksRequest {
        status: Some("paused".to_owned()),
        progress_min: Some(-1),
        ..ListTasksRequest::default()
    };

    let err = deck
        .queries
        .list(&request)
        .await
        .err()
        .ok_or_else(|| eyre!("invalid request should fail"))?;

    ensure!(err.kind() == TaskErrorKind::Validation);
    Ok(())
}
