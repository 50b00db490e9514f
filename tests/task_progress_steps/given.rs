//! Given steps for task progress BDD scenarios.

use super::world::{TaskProgressWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a task titled "{title}""#)]
fn task_titled(world: &mut TaskProgressWorld, title: String) -> Result<(), eyre::Report> {
    let created = run_async(world.service.create_quick(&title))
        .wrap_err("create task for progress scenario")?;
    world.current_task = Some(created);
    Ok(())
}

#[given("the task has progress {progress:i64}")]
fn task_has_progress(world: &mut TaskProgressWorld, progress: i64) -> Result<(), eyre::Report> {
    let id = world.task()?.id();
    let updated = run_async(world.service.set_progress(id, progress))
        .wrap_err("set progress in scenario setup")?;
    world.current_task = Some(updated);
    Ok(())
}
