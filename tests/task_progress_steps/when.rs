//! When steps for task progress BDD scenarios.

use super::world::{TaskProgressWorld, run_async};
use crate::test_helpers::days;
use rstest_bdd_macros::when;
use taskdeck::task::domain::{TaskOverrides, TaskPatch};

#[when("its progress is set to {progress:i64}")]
fn progress_is_set(world: &mut TaskProgressWorld, progress: i64) -> Result<(), eyre::Report> {
    let id = world.task()?.id();
    world.clock.advance(days(1));
    let result = run_async(world.service.set_progress(id, progress));
    world.record(result);
    Ok(())
}

#[when("its progress is updated to {progress:i64}")]
fn progress_is_updated(world: &mut TaskProgressWorld, progress: i64) -> Result<(), eyre::Report> {
    let id = world.task()?.id();
    let patch = TaskPatch::new().with_progress(progress);
    let result = run_async(world.service.update(id, &patch));
    world.record(result);
    Ok(())
}

#[when("the task is duplicated")]
fn task_is_duplicated(world: &mut TaskProgressWorld) -> Result<(), eyre::Report> {
    let id = world.task()?.id();
    let result = run_async(world.service.duplicate(id, TaskOverrides::new()));
    world.record(result);
    Ok(())
}
