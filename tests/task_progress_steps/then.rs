//! Then steps for task progress BDD scenarios.

use super::world::TaskProgressWorld;
use mockable::Clock;
use rstest_bdd_macros::then;
use taskdeck::task::{domain::TaskStatus, services::TaskServiceError};

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskProgressWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.task()?;

    eyre::ensure!(
        task.status() == expected,
        "expected status {}, found {}",
        expected.as_str(),
        task.status().as_str()
    );
    Ok(())
}

#[then("the task is marked completed")]
fn task_is_completed(world: &TaskProgressWorld) -> Result<(), eyre::Report> {
    let task = world.task()?;

    eyre::ensure!(task.is_completed(), "task should be completed");
    eyre::ensure!(task.progress() == 100, "completed task should be at 100%");
    eyre::ensure!(
        task.completed_at() == Some(world.clock.utc()),
        "completion time should be the time of the change"
    );
    Ok(())
}

#[then("the task is not marked completed")]
fn task_is_not_completed(world: &TaskProgressWorld) -> Result<(), eyre::Report> {
    let task = world.task()?;

    eyre::ensure!(!task.is_completed(), "task should be open");
    eyre::ensure!(task.completed_at().is_none(), "open task has no completion time");
    Ok(())
}

#[then(r#"the task title is "{title}""#)]
fn task_title_is(world: &TaskProgressWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.task()?;

    eyre::ensure!(task.title() == title, "expected title {title}, found {}", task.title());
    eyre::ensure!(task.progress() == 0, "copy should start at 0%");
    Ok(())
}

#[then(r#"the change fails with a validation error on "{field}""#)]
fn change_fails_on_field(world: &TaskProgressWorld, field: String) -> Result<(), eyre::Report> {
    match world.last_error.as_ref() {
        Some(TaskServiceError::Validation(err)) if err.concerns(&field) => Ok(()),
        other => Err(eyre::eyre!(
            "expected validation error on {field}, got {other:?}"
        )),
    }
}
