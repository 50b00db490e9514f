//! `PostgreSQL` integration tests for storing, updating and deleting tasks.

use super::helpers::{PgDeck, pg_deck};
use crate::test_helpers::days;
use eyre::ensure;
use mockable::Clock;
use rstest::rstest;
use taskdeck::task::{
    domain::{RepeatDraft, Task, TaskDraft, TaskId, TaskPatch},
    ports::{TaskRepository, TaskRepositoryError},
    services::TaskErrorKind,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stored_task_reads_back_unchanged(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    let draft = TaskDraft::new("Quarterly report")
        .with_description("Numbers for Q1")
        .with_priority("high")
        .with_category("work")
        .with_tags(["finance", "finance", "q1"])
        .with_progress(40)
        .with_due_date(deck.clock.utc() + days(5))
        .with_repeat(RepeatDraft::new("weekly").with_interval(2))
        .with_notes(["collect invoices"]);

    let created = deck.lifecycle.create(&draft).await?;
    let fetched = deck.lifecycle.get(created.id()).await?;

    ensure!(fetched == created, "round-trip changed the task: {fetched:?}");
    ensure!(fetched.tags() == ["finance", "finance", "q1"]);
    ensure!(fetched.notes().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn storing_the_same_id_twice_is_a_duplicate(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    let task = Task::create(&TaskDraft::new("Only once"), &*deck.clock)?;
    deck.repository.store(&task).await?;

    let result = deck.repository.store(&task).await;

    ensure!(
        matches!(result, Err(TaskRepositoryError::DuplicateTask(id)) if id == task.id()),
        "expected a duplicate error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_state_survives_persistence(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    let task = deck.lifecycle.create(&TaskDraft::new("Ship it")).await?;

    let completed = deck.lifecycle.mark_complete(task.id()).await?;
    let fetched = deck.lifecycle.get(task.id()).await?;
    ensure!(fetched == completed);
    ensure!(fetched.is_completed() && fetched.progress() == 100);
    ensure!(fetched.completed_at() == Some(deck.clock.utc()));

    let reopened = deck
        .lifecycle
        .update(task.id(), &TaskPatch::new().with_progress(30))
        .await?;
    let fetched = deck.lifecycle.get(task.id()).await?;
    ensure!(fetched == reopened);
    ensure!(!fetched.is_completed() && fetched.completed_at().is_none());
    ensure!(fetched.status().as_str() == "in_progress");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn patching_due_date_to_null_clears_it(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    let task = deck
        .lifecycle
        .create(&TaskDraft::new("Flexible").with_due_date(deck.clock.utc() + days(1)))
        .await?;

    deck.lifecycle
        .update(task.id(), &TaskPatch::new().with_due_date(None))
        .await?;

    let fetched = deck.lifecycle.get(task.id()).await?;
    ensure!(fetched.due_date().is_none());
    ensure!(deck.queries.find_due_soon(Some(7)).await?.tasks.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_twice_reports_not_found(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    let task = deck.lifecycle.create(&TaskDraft::new("Short lived")).await?;

    deck.lifecycle.delete(task.id()).await?;
    let second = deck.lifecycle.delete(task.id()).await;
    let direct = deck.repository.delete(task.id()).await;

    ensure!(matches!(second, Err(ref err) if err.kind() == TaskErrorKind::NotFound));
    ensure!(matches!(direct, Err(TaskRepositoryError::NotFound(id)) if id == task.id()));
    ensure!(deck.repository.find_by_id(task.id()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_a_missing_row_reports_not_found(
    #[future] pg_deck: eyre::Result<Option<PgDeck>>,
) -> eyre::Result<()> {
    let Some(deck) = pg_deck.await? else {
        return Ok(());
    };
    let never_stored = Task::create(&TaskDraft::new("Ghost"), &*deck.clock)?;

    let result = deck.repository.update(&never_stored).await;
    let service = deck
        .lifecycle
        .update(TaskId::new(), &TaskPatch::new().with_title("Renamed"))
        .await;

    ensure!(matches!(result, Err(TaskRepositoryError::NotFound(id)) if id == never_stored.id()));
    ensure!(matches!(service, Err(ref err) if err.kind() == TaskErrorKind::NotFound));
    Ok(())
}
