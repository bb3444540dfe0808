use crate::app_state::SharedAppState;
use crate::tasks::{overdue::check_overdue_loans, retention::run_retention_sweep};

/// Run the background jobs on their configured intervals until the stop
/// flag is raised.
pub async fn setup_scheduler(
    app_state: SharedAppState,
) -> anyhow::Result<tokio::task::JoinHandle<anyhow::Result<()>>> {
    let stop_flag = app_state.clone().stop_flag.clone();
    let mut scheduler = clokwerk::AsyncScheduler::new();

    {
        let app_state = app_state.clone();
        scheduler
            .every(app_state.settings.scheduler.overdue_check.clone().into())
            .run(move || {
                let app_state = app_state.clone();
                async move {
                    check_overdue_loans(app_state).await;
                }
            });
    }
    {
        let app_state = app_state.clone();
        scheduler
            .every(app_state.settings.scheduler.retention_check.clone().into())
            .run(move || {
                let app_state = app_state.clone();
                async move {
                    run_retention_sweep(app_state).await;
                }
            });
    }

    let handle = tokio::spawn({
        let stop_flag = stop_flag.clone();
        async move {
            while !stop_flag.is_stopped() {
                scheduler.run_pending().await;
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
            }

            Ok(())
        }
    });

    Ok(handle)
}
